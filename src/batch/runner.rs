//! Drive the pipeline for every run of a batch.
//!
//! For one run: read the file set, aggregate the slice's station rows, the
//! network's station rows, the bandwidth markers and the power markers,
//! then derive per-seed metrics. Runs are evaluated one after the other and
//! the first failure aborts the batch.

use super::config::{Batch, RunConfig};
use crate::aggregator::{
    aggregate, derive_bandwidth, derive_per, derive_spectral_efficiency, derive_throughput,
    BandwidthRule, PacketRule, PowerRule, SeedAccumulator,
};
use crate::assembly::{assemble, Report, RunMetrics, SeedMetrics};
use crate::classifier::{BandwidthSource, FrameLayout, PowerSource, Slice};
use crate::parser::{read_trace_set, TraceHeader, TraceSet};
use crate::utils::config::{Constants, SCHEMA_VERSION};
use crate::utils::error::{AggregationError, PipelineError};
use log::{info, warn};

/// Evaluate every run and assemble the report
///
/// **Public** - main entry point for batch analysis
///
/// # Errors
/// The first `PipelineError` of any run; no partial report is produced
pub fn run_batch(batch: &Batch) -> Result<Report, PipelineError> {
    let config = &batch.config;
    let mut runs = Vec::with_capacity(config.runs.len());

    for run in &config.runs {
        let layout = batch.layout_for(run)?;
        runs.push(evaluate_run(run, layout, config.slice, &config.constants)?);
    }

    let groups = assemble(&runs);
    info!("Batch complete: {} runs in {} groups", runs.len(), groups.len());

    Ok(Report {
        version: SCHEMA_VERSION.to_string(),
        generated_at: chrono::Utc::now().to_rfc3339(),
        slice: config.slice,
        constants: config.constants,
        groups,
        runs,
    })
}

/// Read, classify, aggregate and derive one configuration run
///
/// **Public** - also used directly by tests and library callers
///
/// # Arguments
/// * `run` - Run entry with resolved file paths
/// * `layout` - Validated layout of the run's traces
/// * `slice` - Slice whose packet metrics are reported
/// * `constants` - Batch constants
///
/// # Errors
/// * `FormatError` - unreadable file or bad selected row
/// * `AggregationError` - uneven seed blocks or zero bandwidth
pub fn evaluate_run(
    run: &RunConfig,
    layout: &FrameLayout,
    slice: Slice,
    constants: &Constants,
) -> Result<RunMetrics, PipelineError> {
    info!(
        "Evaluating {} '{}' ({}), slice {}",
        run.strategy,
        run.label,
        if run.mobility { "mobility" } else { "no mobility" },
        slice
    );

    let set = read_trace_set(&run.files, constants.header_rows)?;
    let header = set.header;

    let slice_accs = aggregate(&set, &header, &PacketRule::slice(layout, slice))?;
    let network_accs = aggregate(&set, &header, &PacketRule::any_slice(layout))?;
    let bandwidth_accs = aggregate_bandwidth(&set, &header, layout)?;
    let power = power_samples(&set, &header, layout, slice)?;

    let mut seeds = Vec::with_capacity(slice_accs.len());

    for (index, acc) in slice_accs.iter().enumerate() {
        let throughput = derive_throughput(network_accs[index].rx_packets, constants);
        let bandwidth = derive_bandwidth(
            &bandwidth_accs[index],
            &layout.bandwidth,
            layout.strategy,
            constants,
        );

        if bandwidth <= 0.0 {
            return Err(AggregationError::ZeroBandwidth {
                run: run.label.clone(),
                seed: index,
            }
            .into());
        }

        if acc.rows == 0 {
            warn!("Run '{}' seed {}: no rows for slice {}", run.label, index, slice);
        }

        seeds.push(SeedMetrics {
            seed: index,
            rows: acc.rows,
            tx_packets: acc.tx_packets,
            rx_packets: acc.rx_packets,
            per: derive_per(acc),
            latency: acc.latency_samples.clone(),
            slice_throughput_mbps: derive_throughput(acc.rx_packets, constants),
            throughput_mbps: throughput,
            bandwidth_mhz: bandwidth,
            spectral_efficiency: derive_spectral_efficiency(throughput, bandwidth),
            tx_power_dbm: power[index].clone(),
        });
    }

    Ok(RunMetrics {
        label: run.label.clone(),
        strategy: run.strategy,
        mobility: run.mobility,
        layout: layout.name.clone(),
        slice,
        files: run.files.clone(),
        header,
        seeds,
    })
}

/// Bandwidth accumulators, empty ones for fixed sources
///
/// **Private** - marker rows are only read when the layout has them
fn aggregate_bandwidth(
    set: &TraceSet,
    header: &TraceHeader,
    layout: &FrameLayout,
) -> Result<Vec<SeedAccumulator>, PipelineError> {
    match &layout.bandwidth {
        BandwidthSource::Markers { rows, columns } => {
            aggregate(set, header, &BandwidthRule::new(layout, rows, columns))
        }
        BandwidthSource::Fixed { .. } => Ok(seed_range(header).map(SeedAccumulator::new).collect()),
    }
}

/// Transmit-power samples of `slice`, one list per seed
fn power_samples(
    set: &TraceSet,
    header: &TraceHeader,
    layout: &FrameLayout,
    slice: Slice,
) -> Result<Vec<Vec<f64>>, PipelineError> {
    match &layout.tx_power {
        PowerSource::Markers {
            column,
            slice_a,
            slice_b,
            slice_c,
        } => {
            let rows = match slice {
                Slice::A => slice_a,
                Slice::B => slice_b,
                Slice::C => slice_c,
            };
            let accs = aggregate(set, header, &PowerRule::new(layout, rows, *column))?;
            Ok(accs.into_iter().map(|acc| acc.power_samples).collect())
        }
        PowerSource::Fixed { dbm } => Ok(seed_range(header).map(|_| vec![*dbm]).collect()),
    }
}

fn seed_range(header: &TraceHeader) -> impl Iterator<Item = usize> {
    0..header.seed_count as usize
}
