//! Frame layouts: the data-driven description of one trace family.
//!
//! A layout says how long a super-frame is, where the slices sit inside it,
//! which rows are auxiliary, and where the channel allocation (bandwidth and
//! transmit power) can be read. Layouts are validated once, before any trace
//! is touched; a layout that passes validation classifies every offset into
//! exactly one slice or the ignored set.

use super::ranges::{OffsetSet, SliceRange};
use super::slice::{classify, frame_offset, Classification, Slice, SliceAssignment, Strategy};
use crate::utils::error::ConfigurationError;
use serde::{Deserialize, Serialize};

/// Largest accepted super-frame, keeps validation memory bounded
pub const MAX_PERIOD: u64 = 1 << 20;

/// Where a run's occupied bandwidth comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BandwidthSource {
    /// The same bandwidth for the whole run
    Fixed { mhz: f64 },

    /// Channel widths read from marker rows, summed per seed
    Markers { rows: OffsetSet, columns: Vec<usize> },
}

/// Where a slice's transmit power comes from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PowerSource {
    /// Constant power, one sample per seed
    Fixed { dbm: f64 },

    /// One sample per matching marker row
    Markers {
        column: usize,
        slice_a: OffsetSet,
        slice_b: OffsetSet,
        slice_c: OffsetSet,
    },
}

impl Default for PowerSource {
    fn default() -> Self {
        PowerSource::Fixed {
            dbm: crate::utils::config::DEFAULT_TX_POWER_DBM,
        }
    }
}

impl PowerSource {
    /// Marker rows carrying the power of `slice`, if read from the trace
    pub fn rows_for(&self, slice: Slice) -> Option<&OffsetSet> {
        match self {
            PowerSource::Fixed { .. } => None,
            PowerSource::Markers {
                slice_a,
                slice_b,
                slice_c,
                ..
            } => Some(match slice {
                Slice::A => slice_a,
                Slice::B => slice_b,
                Slice::C => slice_c,
            }),
        }
    }
}

/// Layout of one trace family
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameLayout {
    /// Identifier referenced by batch runs
    pub name: String,

    pub strategy: Strategy,

    /// Rows per super-frame
    pub period: u64,

    /// Subtracted from a row position before taking it modulo the period
    #[serde(default)]
    pub position_base: i64,

    #[serde(flatten)]
    pub assignment: SliceAssignment,

    /// Auxiliary rows (channel headings, marker rows, intermediate blocks)
    #[serde(default)]
    pub ignored: OffsetSet,

    pub bandwidth: BandwidthSource,

    #[serde(default)]
    pub tx_power: PowerSource,
}

impl FrameLayout {
    /// Super-frame offset of a row position
    pub fn offset(&self, position: u64) -> Option<u64> {
        frame_offset(to_signed(position), self.period, self.position_base)
    }

    /// Classify a row position under this layout
    pub fn classify(&self, position: u64) -> Classification {
        classify(
            to_signed(position),
            self.period,
            self.position_base,
            &self.assignment,
        )
    }

    /// Whether a row position falls inside `rows`
    pub fn matches(&self, position: u64, rows: &OffsetSet) -> bool {
        self.offset(position)
            .is_some_and(|offset| rows.contains(offset))
    }

    /// Number of rows each slice takes per super-frame
    pub fn rows_per_frame(&self, slice: Slice) -> usize {
        self.assignment.get(slice).offsets(self.period).count()
    }

    /// Check the layout once before it is used
    ///
    /// **Public** - called by the layout table and the `validate` command
    ///
    /// # Errors
    /// * `ConfigurationError::ZeroPeriod` - empty super-frame
    /// * `ConfigurationError::PeriodTooLarge` - super-frame above `MAX_PERIOD`
    /// * `ConfigurationError::RangeOutOfBounds` - a bound is not below the period
    /// * `ConfigurationError::Overlap` - an offset is claimed twice
    /// * `ConfigurationError::Gap` - an offset is claimed by nothing
    /// * `ConfigurationError::StrategyMismatch` - layout shape contradicts its strategy
    /// * `ConfigurationError::MarkerOutsideIgnored` - a marker row is a station row
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.period == 0 {
            return Err(ConfigurationError::ZeroPeriod {
                layout: self.name.clone(),
            });
        }

        if self.period > MAX_PERIOD {
            return Err(ConfigurationError::PeriodTooLarge {
                layout: self.name.clone(),
                period: self.period,
                max: MAX_PERIOD,
            });
        }

        for set in self.all_offset_sets() {
            self.check_bounds(set)?;
        }

        self.check_partition()?;
        self.check_strategy()?;
        self.check_markers()?;

        Ok(())
    }

    /// Every offset set the layout declares
    ///
    /// **Private** - internal helper for validate
    fn all_offset_sets(&self) -> Vec<&OffsetSet> {
        let mut sets = vec![
            &self.assignment.slice_a,
            &self.assignment.slice_b,
            &self.assignment.slice_c,
            &self.ignored,
        ];

        if let BandwidthSource::Markers { rows, .. } = &self.bandwidth {
            sets.push(rows);
        }

        for slice in Slice::ALL {
            if let Some(rows) = self.tx_power.rows_for(slice) {
                sets.push(rows);
            }
        }

        sets
    }

    fn check_bounds(&self, set: &OffsetSet) -> Result<(), ConfigurationError> {
        match set.ranges().iter().find(|range| !range.fits(self.period)) {
            Some(SliceRange { start, end }) => Err(ConfigurationError::RangeOutOfBounds {
                layout: self.name.clone(),
                start: *start,
                end: *end,
                period: self.period,
            }),
            None => Ok(()),
        }
    }

    /// Slices plus ignored rows must cover each offset exactly once
    ///
    /// **Private** - internal helper for validate
    fn check_partition(&self) -> Result<(), ConfigurationError> {
        let mut owner: Vec<Option<&'static str>> = vec![None; self.period as usize];

        let claims: [(&'static str, &OffsetSet); 4] = [
            ("slice A", &self.assignment.slice_a),
            ("slice B", &self.assignment.slice_b),
            ("slice C", &self.assignment.slice_c),
            ("ignored", &self.ignored),
        ];

        for (label, set) in claims {
            for offset in set.offsets(self.period) {
                let slot = &mut owner[offset as usize];
                if let Some(first) = slot {
                    return Err(ConfigurationError::Overlap {
                        layout: self.name.clone(),
                        offset,
                        first: first.to_string(),
                        second: label.to_string(),
                    });
                }
                *slot = Some(label);
            }
        }

        match owner.iter().position(Option::is_none) {
            Some(offset) => Err(ConfigurationError::Gap {
                layout: self.name.clone(),
                offset: offset as u64,
            }),
            None => Ok(()),
        }
    }

    fn check_strategy(&self) -> Result<(), ConfigurationError> {
        let mismatch = |reason: &str| -> Result<(), ConfigurationError> {
            Err(ConfigurationError::StrategyMismatch {
                layout: self.name.clone(),
                reason: reason.to_string(),
            })
        };

        match (&self.strategy, &self.bandwidth) {
            (Strategy::SingleChannel, _) if !self.ignored.is_empty() => {
                mismatch("single-channel traces have no auxiliary rows")
            }
            (Strategy::SingleChannel, BandwidthSource::Markers { .. }) => {
                mismatch("single-channel bandwidth must be fixed")
            }
            (Strategy::Static | Strategy::Dynamic, BandwidthSource::Fixed { .. }) => {
                mismatch("sliced bandwidth must be read from marker rows")
            }
            (_, BandwidthSource::Fixed { mhz }) if *mhz <= 0.0 || !mhz.is_finite() => {
                mismatch("fixed bandwidth must be positive")
            }
            (_, BandwidthSource::Markers { columns, .. }) if columns.is_empty() => {
                mismatch("bandwidth markers need at least one column")
            }
            _ => Ok(()),
        }
    }

    fn check_markers(&self) -> Result<(), ConfigurationError> {
        let mut marker_sets: Vec<&OffsetSet> = Vec::new();

        if let BandwidthSource::Markers { rows, .. } = &self.bandwidth {
            marker_sets.push(rows);
        }
        for slice in Slice::ALL {
            if let Some(rows) = self.tx_power.rows_for(slice) {
                marker_sets.push(rows);
            }
        }

        for set in marker_sets {
            if let Some(offset) = set
                .offsets(self.period)
                .find(|offset| !self.ignored.contains(*offset))
            {
                return Err(ConfigurationError::MarkerOutsideIgnored {
                    layout: self.name.clone(),
                    offset,
                });
            }
        }

        Ok(())
    }
}

/// Row positions are bounded by file length, far below `i64::MAX`
fn to_signed(position: u64) -> i64 {
    i64::try_from(position).unwrap_or(i64::MAX)
}
