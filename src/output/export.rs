//! Long-format CSV export of assembled results.
//!
//! One record per value: `mobility,strategy,metric,index,value`, where
//! `index` is the position of the value inside its group's list. Plotting
//! tools can pivot this without knowing the report schema.

use super::json::{ensure_parent_dir, validate_output_path};
use crate::assembly::{Report, StrategyResult};
use crate::classifier::Strategy;
use crate::utils::error::OutputError;
use log::info;
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct MetricRecord<'a> {
    mobility: bool,
    strategy: Strategy,
    metric: &'a str,
    index: usize,
    value: f64,
}

/// Named value lists of a group, in export order
fn metric_columns(group: &StrategyResult) -> [(&'static str, &[f64]); 6] {
    [
        ("per", &group.per),
        ("latency", &group.latency),
        ("throughput_mbps", &group.throughput_mbps),
        ("slice_throughput_mbps", &group.slice_throughput_mbps),
        ("spectral_efficiency", &group.spectral_efficiency),
        ("tx_power_dbm", &group.tx_power_dbm),
    ]
}

/// Write every group of a report to any writer
///
/// # Returns
/// Number of records written, header excluded
pub fn write_groups<W: Write>(groups: &[StrategyResult], writer: W) -> Result<usize, OutputError> {
    let mut wtr = csv::Writer::from_writer(writer);
    let mut written = 0;

    for group in groups {
        for (metric, values) in metric_columns(group) {
            for (index, value) in values.iter().enumerate() {
                wtr.serialize(MetricRecord {
                    mobility: group.mobility,
                    strategy: group.strategy,
                    metric,
                    index,
                    value: *value,
                })?;
                written += 1;
            }
        }
    }

    wtr.flush()?;
    Ok(written)
}

/// Write a report's groups to a CSV file
///
/// **Public** - used by `analyze --csv`
///
/// # Errors
/// * `OutputError::InvalidPath` - Path is empty, a directory or cannot be created
/// * `OutputError::CsvFailed` - CSV encoding error
/// * `OutputError::WriteFailed` - I/O error during write
pub fn write_csv(report: &Report, output_path: impl AsRef<Path>) -> Result<(), OutputError> {
    let output_path = output_path.as_ref();

    validate_output_path(output_path)?;
    ensure_parent_dir(output_path)?;

    let file = std::fs::File::create(output_path)?;
    let written = write_groups(&report.groups, file)?;

    info!("CSV written to {} ({} records)", output_path.display(), written);
    Ok(())
}
