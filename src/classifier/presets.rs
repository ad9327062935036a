//! Reference layouts of the slicing simulations.
//!
//! Every super-frame is one seed run of the simulator. Station rows are
//! written slice by slice (A first), so a layout follows from the station
//! counts of the three slices:
//!
//! - single channel: only station rows, `n` per run
//! - static slicing: a heading row and a channel-width row, then `n` station rows
//! - dynamic slicing: an initial channel group (heading + one row per slice),
//!   then one block per channel update (channel group + `n` station rows);
//!   the last block's station rows hold the end-of-run counters

use super::layout::{BandwidthSource, FrameLayout, PowerSource};
use super::ranges::{OffsetSet, SliceRange};
use super::slice::{SliceAssignment, Strategy};
use crate::utils::config::{
    ALLOCATION_COLUMN, CHANNEL_GROUP_ROWS, DEFAULT_TX_POWER_DBM, DYNAMIC_CHANNEL_GROUPS,
    DYNAMIC_POWER_COLUMN, SINGLE_CHANNEL_BANDWIDTH_MHZ,
};
use crate::utils::error::ConfigurationError;

/// Station counts of slices A, B and C
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StationShape {
    pub slice_a: u64,
    pub slice_b: u64,
    pub slice_c: u64,
}

impl StationShape {
    pub const fn new(slice_a: u64, slice_b: u64, slice_c: u64) -> Self {
        Self {
            slice_a,
            slice_b,
            slice_c,
        }
    }

    /// Stations per run
    ///
    /// # Errors
    /// * `ConfigurationError::InvalidShape` - a slice without stations or an
    ///   unrepresentable total
    pub fn total(&self) -> Result<u64, ConfigurationError> {
        if self.slice_a == 0 || self.slice_b == 0 || self.slice_c == 0 {
            return Err(self.invalid("every slice needs at least one station"));
        }

        self.slice_a
            .checked_add(self.slice_b)
            .and_then(|sum| sum.checked_add(self.slice_c))
            .ok_or_else(|| self.invalid("station count overflows"))
    }

    /// Label used by the simulation notes, e.g. `2-100-6`
    pub fn label(&self) -> String {
        format!("{}-{}-{}", self.slice_a, self.slice_b, self.slice_c)
    }

    fn invalid(&self, reason: &str) -> ConfigurationError {
        ConfigurationError::InvalidShape {
            shape: self.label(),
            reason: reason.to_string(),
        }
    }
}

impl From<(u64, u64, u64)> for StationShape {
    fn from((a, b, c): (u64, u64, u64)) -> Self {
        Self::new(a, b, c)
    }
}

/// Layout name for a strategy and shape, e.g. `static-2-100-6`
pub fn layout_name(strategy: Strategy, shape: StationShape) -> String {
    format!("{}-{}", strategy.key(), shape.label())
}

/// Slice ranges when station rows start at `first` and the last slice wraps to offset 0
///
/// **Private** - shared by the single-channel and static layouts
fn wrapped_assignment(first: u64, period: u64, shape: StationShape) -> SliceAssignment {
    let b_start = first + shape.slice_a;
    let c_start = b_start + shape.slice_b;

    SliceAssignment {
        slice_a: single_range(first, b_start - 1),
        slice_b: single_range(b_start, c_start - 1),
        slice_c: single_range(c_start % period, 0),
    }
}

fn single_range(start: u64, end: u64) -> OffsetSet {
    OffsetSet::new(vec![SliceRange::new(start, end)])
}

/// Single-channel layout: all stations share one 160 MHz channel
///
/// # Errors
/// * `ConfigurationError::InvalidShape` - see `StationShape::total`
pub fn single_channel(shape: StationShape) -> Result<FrameLayout, ConfigurationError> {
    let period = shape.total()?;

    Ok(FrameLayout {
        name: layout_name(Strategy::SingleChannel, shape),
        strategy: Strategy::SingleChannel,
        period,
        position_base: 0,
        assignment: wrapped_assignment(1, period, shape),
        ignored: OffsetSet::default(),
        bandwidth: BandwidthSource::Fixed {
            mhz: SINGLE_CHANNEL_BANDWIDTH_MHZ,
        },
        tx_power: PowerSource::Fixed {
            dbm: DEFAULT_TX_POWER_DBM,
        },
    })
}

/// Static-slicing layout: widths of the three channels sit in the second row of each run
pub fn static_slicing(shape: StationShape) -> Result<FrameLayout, ConfigurationError> {
    let period = shape
        .total()?
        .checked_add(2)
        .ok_or_else(|| shape.invalid("station count overflows"))?;

    Ok(FrameLayout {
        name: layout_name(Strategy::Static, shape),
        strategy: Strategy::Static,
        period,
        position_base: 0,
        assignment: wrapped_assignment(3, period, shape),
        ignored: single_range(1, 2),
        bandwidth: BandwidthSource::Markers {
            rows: OffsetSet::new(vec![SliceRange::single(2)]),
            // channelWidthA, channelWidthB, channelWidthC
            columns: vec![1, 3, 5],
        },
        tx_power: PowerSource::Fixed {
            dbm: DEFAULT_TX_POWER_DBM,
        },
    })
}

/// Dynamic-slicing layout with the reference number of channel groups
pub fn dynamic_slicing(shape: StationShape) -> Result<FrameLayout, ConfigurationError> {
    dynamic_slicing_with_groups(shape, DYNAMIC_CHANNEL_GROUPS)
}

/// Dynamic-slicing layout
///
/// `groups` counts the initial channel group plus every update block. The
/// final block's channel group repeats the previous allocation and is not
/// sampled.
///
/// # Errors
/// * `ConfigurationError::InvalidShape` - no channel group, an empty slice or
///   a super-frame too long to count
pub fn dynamic_slicing_with_groups(
    shape: StationShape,
    groups: u64,
) -> Result<FrameLayout, ConfigurationError> {
    if groups == 0 {
        return Err(shape.invalid("dynamic layouts need at least one channel group"));
    }

    let stations = shape.total()?;
    let period = stations
        .checked_add(CHANNEL_GROUP_ROWS)
        .and_then(|block| block.checked_mul(groups))
        .and_then(|rows| rows.checked_add(CHANNEL_GROUP_ROWS))
        .ok_or_else(|| shape.invalid("super-frame length overflows"))?;
    let block = CHANNEL_GROUP_ROWS + stations;
    let final_block = period - stations;

    let a_end = final_block + shape.slice_a;
    let b_end = a_end + shape.slice_b;

    // Channel groups: the initial one at offset 0, then one at the head of
    // every update block except the last
    let group_starts: Vec<u64> = std::iter::once(0)
        .chain((0..groups.saturating_sub(1)).map(|k| CHANNEL_GROUP_ROWS + k * block))
        .collect();

    let bandwidth_rows = group_starts
        .iter()
        .map(|start| SliceRange::new(start + 1, start + 3))
        .collect::<Vec<_>>();

    let power_rows = |slice_index: u64| {
        OffsetSet::new(
            group_starts
                .iter()
                .map(|start| SliceRange::single(start + 1 + slice_index))
                .collect(),
        )
    };

    Ok(FrameLayout {
        name: layout_name(Strategy::Dynamic, shape),
        strategy: Strategy::Dynamic,
        period,
        position_base: 1,
        assignment: SliceAssignment {
            slice_a: single_range(final_block, a_end - 1),
            slice_b: single_range(a_end, b_end - 1),
            slice_c: single_range(b_end, period - 1),
        },
        ignored: single_range(0, final_block - 1),
        bandwidth: BandwidthSource::Markers {
            rows: OffsetSet::new(bandwidth_rows),
            columns: vec![ALLOCATION_COLUMN],
        },
        tx_power: PowerSource::Markers {
            column: DYNAMIC_POWER_COLUMN,
            slice_a: power_rows(0),
            slice_b: power_rows(1),
            slice_c: power_rows(2),
        },
    })
}

/// Layout for any strategy
pub fn layout_for(
    strategy: Strategy,
    shape: StationShape,
) -> Result<FrameLayout, ConfigurationError> {
    match strategy {
        Strategy::SingleChannel => single_channel(shape),
        Strategy::Static => static_slicing(shape),
        Strategy::Dynamic => dynamic_slicing(shape),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::slice::{Classification, Slice};

    const SHAPE: StationShape = StationShape::new(2, 100, 6);

    #[test]
    fn test_single_channel_ranges() {
        let layout = single_channel(SHAPE).unwrap();

        assert_eq!(layout.period, 108);
        assert_eq!(layout.assignment.slice_a, single_range(1, 2));
        assert_eq!(layout.assignment.slice_b, single_range(3, 102));
        assert_eq!(layout.assignment.slice_c, single_range(103, 0));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_static_ranges() {
        let layout = static_slicing(StationShape::new(6, 100, 2)).unwrap();

        assert_eq!(layout.period, 110);
        assert_eq!(layout.assignment.slice_a, single_range(3, 8));
        assert_eq!(layout.assignment.slice_b, single_range(9, 108));
        assert_eq!(layout.assignment.slice_c, single_range(109, 0));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_dynamic_ranges() {
        let layout = dynamic_slicing(SHAPE).unwrap();

        assert_eq!(layout.period, 1684);
        assert_eq!(layout.position_base, 1);
        assert_eq!(layout.assignment.slice_a, single_range(1576, 1577));
        assert_eq!(layout.assignment.slice_b, single_range(1578, 1677));
        assert_eq!(layout.assignment.slice_c, single_range(1678, 1683));
        assert!(layout.validate().is_ok());

        // First station row of the final block sits at position 1577
        assert_eq!(layout.classify(1577), Classification::SliceA);
        assert_eq!(layout.classify(1576), Classification::Discard);
    }

    #[test]
    fn test_dynamic_marker_rows() {
        let layout = dynamic_slicing(SHAPE).unwrap();

        let BandwidthSource::Markers { rows, columns } = &layout.bandwidth else {
            panic!("dynamic bandwidth must come from markers");
        };
        assert_eq!(columns, &vec![ALLOCATION_COLUMN]);
        assert_eq!(rows.ranges().len(), 15);
        assert_eq!(rows.ranges()[0], SliceRange::new(1, 3));
        assert_eq!(rows.ranges()[1], SliceRange::new(5, 7));
        assert_eq!(rows.ranges()[14], SliceRange::new(1461, 1463));
        assert!(!rows.contains(1573));

        let power_b = layout.tx_power.rows_for(Slice::B).unwrap();
        assert!(power_b.contains(2));
        assert!(power_b.contains(6));
        assert!(!power_b.contains(5));
        assert_eq!(power_b.offsets(layout.period).count(), 15);
    }

    #[test]
    fn test_single_station_last_slice() {
        let layout = static_slicing(StationShape::new(1, 1, 1)).unwrap();
        assert_eq!(layout.assignment.slice_c, single_range(0, 0));
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_empty_slice_is_rejected() {
        let shape = StationShape::new(0, 0, 0);

        assert!(matches!(
            single_channel(shape),
            Err(ConfigurationError::InvalidShape { .. })
        ));
        assert!(static_slicing(StationShape::new(2, 0, 6)).is_err());
        assert!(dynamic_slicing(shape).is_err());
    }

    #[test]
    fn test_dynamic_without_groups_is_rejected() {
        let err = dynamic_slicing_with_groups(SHAPE, 0).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidShape { .. }));
    }

    #[test]
    fn test_oversized_shape_does_not_overflow() {
        let shape = StationShape::new(u64::MAX, 1, 1);

        assert!(single_channel(shape).is_err());
        assert!(dynamic_slicing_with_groups(StationShape::new(1, 1, 1), u64::MAX).is_err());
    }
}
