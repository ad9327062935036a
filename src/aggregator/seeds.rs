//! Per-seed accumulation of selected trace rows.
//!
//! Rows are written seed-major: once a rule has picked the rows it cares
//! about, the first `N / seeds` of them belong to seed 0, the next block to
//! seed 1 and so on. The split must be exact, a remainder means the layout
//! does not describe the trace.

use crate::classifier::{FrameLayout, OffsetSet, Slice};
use crate::parser::{TraceHeader, TraceRow, TraceSet};
use crate::utils::config::{LATENCY_COLUMN, RX_PACKETS_COLUMN, TX_PACKETS_COLUMN};
use crate::utils::error::{AggregationError, FormatError, PipelineError};
use log::debug;
use std::path::Path;

/// Transmitted and received packets of one station row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PacketSample {
    pub tx: f64,
    pub rx: f64,
}

/// Running sums for one seed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SeedAccumulator {
    /// Zero-based seed index
    pub seed: usize,

    /// Rows folded into this seed
    pub rows: usize,

    pub tx_packets: f64,
    pub rx_packets: f64,

    /// Sum of the allocation columns of bandwidth marker rows
    pub bandwidth_units: f64,

    /// Latency of every row that received at least one packet
    pub latency_samples: Vec<f64>,

    /// Per-row packet counts, in row order
    pub packet_samples: Vec<PacketSample>,

    /// Transmit power read from marker rows
    pub power_samples: Vec<f64>,
}

impl SeedAccumulator {
    pub fn new(seed: usize) -> Self {
        Self {
            seed,
            ..Default::default()
        }
    }
}

/// Row selection plus the columns a selected row contributes
pub trait SampleRule {
    /// Short description for logs
    fn describe(&self) -> String;

    /// Whether the row at `position` takes part in the aggregation
    fn selects(&self, position: u64) -> bool;

    /// Fold a selected row into its seed's accumulator
    ///
    /// # Errors
    /// `FormatError` naming the file, position and column of the first field
    /// that is missing or not numeric
    fn accumulate(
        &self,
        path: &Path,
        row: &TraceRow,
        acc: &mut SeedAccumulator,
    ) -> Result<(), FormatError>;
}

/// Which station rows a packet rule keeps
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketTarget {
    Slice(Slice),
    /// Station rows of every slice
    AnySlice,
}

/// Packet counts and latency of station rows
#[derive(Debug, Clone, Copy)]
pub struct PacketRule<'a> {
    layout: &'a FrameLayout,
    target: PacketTarget,
}

impl<'a> PacketRule<'a> {
    pub fn new(layout: &'a FrameLayout, target: PacketTarget) -> Self {
        Self { layout, target }
    }

    pub fn slice(layout: &'a FrameLayout, slice: Slice) -> Self {
        Self::new(layout, PacketTarget::Slice(slice))
    }

    pub fn any_slice(layout: &'a FrameLayout) -> Self {
        Self::new(layout, PacketTarget::AnySlice)
    }
}

impl SampleRule for PacketRule<'_> {
    fn describe(&self) -> String {
        match self.target {
            PacketTarget::Slice(slice) => {
                format!("packets of slice {} ({})", slice, self.layout.name)
            }
            PacketTarget::AnySlice => format!("packets of all slices ({})", self.layout.name),
        }
    }

    fn selects(&self, position: u64) -> bool {
        let class = self.layout.classify(position);
        match self.target {
            PacketTarget::Slice(slice) => class.slice() == Some(slice),
            PacketTarget::AnySlice => class.slice().is_some(),
        }
    }

    fn accumulate(
        &self,
        path: &Path,
        row: &TraceRow,
        acc: &mut SeedAccumulator,
    ) -> Result<(), FormatError> {
        let tx = row.numeric(path, TX_PACKETS_COLUMN)?;
        let rx = row.numeric(path, RX_PACKETS_COLUMN)?;

        // Packet error rate is undefined without transmissions
        if tx <= 0.0 {
            return Err(FormatError::ZeroTransmission {
                path: path.to_path_buf(),
                position: row.position,
            });
        }

        acc.tx_packets += tx;
        acc.rx_packets += rx;
        acc.packet_samples.push(PacketSample { tx, rx });

        if rx != 0.0 {
            acc.latency_samples.push(row.numeric(path, LATENCY_COLUMN)?);
        }

        Ok(())
    }
}

/// Allocated bandwidth from marker rows
#[derive(Debug, Clone, Copy)]
pub struct BandwidthRule<'a> {
    layout: &'a FrameLayout,
    rows: &'a OffsetSet,
    columns: &'a [usize],
}

impl<'a> BandwidthRule<'a> {
    pub fn new(layout: &'a FrameLayout, rows: &'a OffsetSet, columns: &'a [usize]) -> Self {
        Self {
            layout,
            rows,
            columns,
        }
    }
}

impl SampleRule for BandwidthRule<'_> {
    fn describe(&self) -> String {
        format!("bandwidth markers {} ({})", self.rows, self.layout.name)
    }

    fn selects(&self, position: u64) -> bool {
        self.layout.matches(position, self.rows)
    }

    fn accumulate(
        &self,
        path: &Path,
        row: &TraceRow,
        acc: &mut SeedAccumulator,
    ) -> Result<(), FormatError> {
        for column in self.columns {
            acc.bandwidth_units += row.numeric(path, *column)?;
        }
        Ok(())
    }
}

/// Transmit power of one slice from marker rows
#[derive(Debug, Clone, Copy)]
pub struct PowerRule<'a> {
    layout: &'a FrameLayout,
    rows: &'a OffsetSet,
    column: usize,
}

impl<'a> PowerRule<'a> {
    pub fn new(layout: &'a FrameLayout, rows: &'a OffsetSet, column: usize) -> Self {
        Self {
            layout,
            rows,
            column,
        }
    }
}

impl SampleRule for PowerRule<'_> {
    fn describe(&self) -> String {
        format!("tx power markers {} ({})", self.rows, self.layout.name)
    }

    fn selects(&self, position: u64) -> bool {
        self.layout.matches(position, self.rows)
    }

    fn accumulate(
        &self,
        path: &Path,
        row: &TraceRow,
        acc: &mut SeedAccumulator,
    ) -> Result<(), FormatError> {
        acc.power_samples.push(row.numeric(path, self.column)?);
        Ok(())
    }
}

/// Split the rows a rule selects into seed blocks and accumulate them
///
/// **Public** - main entry point of the aggregation stage
///
/// # Arguments
/// * `set` - Concatenated traces of one configuration
/// * `header` - Header whose seed count drives the split
/// * `rule` - Row selection and accumulation
///
/// # Returns
/// Exactly `header.seed_count` accumulators, in seed order
///
/// # Errors
/// * `AggregationError::UnevenSeedBlocks` - selected rows do not divide by the seed count
/// * `FormatError` - a selected row lacks a numeric field the rule needs
pub fn aggregate(
    set: &TraceSet,
    header: &TraceHeader,
    rule: &dyn SampleRule,
) -> Result<Vec<SeedAccumulator>, PipelineError> {
    let selected: Vec<_> = set
        .rows()
        .filter(|(_, row)| rule.selects(row.position))
        .collect();

    let seeds = header.seed_count;
    let total = selected.len();

    if seeds == 0 || total as u64 % seeds != 0 {
        return Err(AggregationError::UnevenSeedBlocks {
            rows: total,
            seeds,
        }
        .into());
    }

    let block = total / seeds as usize;
    debug!(
        "{}: {} rows, {} per seed across {} seeds",
        rule.describe(),
        total,
        block,
        seeds
    );

    let mut accumulators: Vec<SeedAccumulator> =
        (0..seeds as usize).map(SeedAccumulator::new).collect();

    for (index, (trace, row)) in selected.into_iter().enumerate() {
        let acc = &mut accumulators[index / block];
        rule.accumulate(&trace.path, row, acc)?;
        acc.rows += 1;
    }

    Ok(accumulators)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::presets::static_slicing;
    use crate::classifier::StationShape;
    use crate::parser::parse_trace;
    use std::path::PathBuf;

    /// Static layout 1-1-1: period 5, A at 3, B at 4, C at 0, marker row 2
    fn trace(body: &str, seeds: u64) -> TraceSet {
        let text = format!(
            "scenarios,1\nseeds per scenario,{}\nnote\nfirst\nlast\n{}",
            seeds, body
        );
        parse_trace(&PathBuf::from("mem.csv"), text.as_bytes(), 5)
            .unwrap()
            .into()
    }

    fn frame(widths: (u32, u32, u32), a: (u32, u32), b: (u32, u32), c: (u32, u32)) -> String {
        format!(
            "Channel config,,,,,\nwidth,{},x,{},x,{}\nsta,0,0,{},{},1.5\nsta,0,0,{},{},2.5\nsta,0,0,{},{},3.5\n",
            widths.0, widths.1, widths.2, a.0, a.1, b.0, b.1, c.0, c.1
        )
    }

    #[test]
    fn test_packet_rule_per_slice() {
        let body = frame((20, 40, 80), (10, 8), (10, 0), (10, 10)).repeat(2);
        let set = trace(&body, 2);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();

        let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap();
        assert_eq!(accs.len(), 2);
        assert_eq!(accs[0].rows, 1);
        assert_eq!(accs[0].tx_packets, 10.0);
        assert_eq!(accs[0].rx_packets, 8.0);
        assert_eq!(accs[1].latency_samples, vec![1.5]);

        // rx = 0 gives no latency sample
        let accs = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::B)).unwrap();
        assert!(accs.iter().all(|acc| acc.latency_samples.is_empty()));
        assert_eq!(accs[0].packet_samples, vec![PacketSample { tx: 10.0, rx: 0.0 }]);
    }

    #[test]
    fn test_any_slice_rule() {
        let body = frame((20, 40, 80), (10, 8), (10, 0), (10, 10)).repeat(2);
        let set = trace(&body, 2);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();

        let accs = aggregate(&set, &set.header, &PacketRule::any_slice(&layout)).unwrap();
        assert_eq!(accs[0].rows, 3);
        assert_eq!(accs[0].rx_packets, 18.0);
    }

    #[test]
    fn test_bandwidth_rule_sums_columns() {
        let body = frame((20, 40, 80), (10, 8), (10, 0), (10, 10)).repeat(2);
        let set = trace(&body, 2);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();
        let rows = OffsetSet::new(vec![crate::classifier::SliceRange::single(2)]);
        let columns = [1, 3, 5];

        let accs = aggregate(&set, &set.header, &BandwidthRule::new(&layout, &rows, &columns))
            .unwrap();
        assert_eq!(accs[0].bandwidth_units, 140.0);
        assert_eq!(accs[1].bandwidth_units, 140.0);
    }

    #[test]
    fn test_uneven_blocks_rejected() {
        let body = frame((20, 40, 80), (10, 8), (10, 0), (10, 10)).repeat(3);
        let set = trace(&body, 2);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();

        let err = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Aggregation(AggregationError::UnevenSeedBlocks { rows: 3, seeds: 2 })
        ));
    }

    #[test]
    fn test_zero_transmission_rejected() {
        let body = frame((20, 40, 80), (0, 0), (10, 0), (10, 10));
        let set = trace(&body, 1);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();

        let err = aggregate(&set, &set.header, &PacketRule::slice(&layout, Slice::A)).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Format(FormatError::ZeroTransmission { position: 3, .. })
        ));
    }

    #[test]
    fn test_text_rows_never_selected_are_fine() {
        // Heading rows at offset 1 are not numeric but no rule touches them
        let body = frame((20, 40, 80), (10, 8), (10, 5), (10, 10));
        let set = trace(&body, 1);
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();

        assert!(aggregate(&set, &set.header, &PacketRule::any_slice(&layout)).is_ok());
    }
}
