//! Offset ranges over one super-frame.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of super-frame offsets
///
/// A range whose `start` is greater than its `end` wraps past the last
/// offset of the period back to zero: `[105, 0]` with period 110 is the set
/// `{105, 106, 107, 108, 109, 0}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "(u64, u64)", into = "(u64, u64)")]
pub struct SliceRange {
    pub start: u64,
    pub end: u64,
}

impl SliceRange {
    pub const fn new(start: u64, end: u64) -> Self {
        Self { start, end }
    }

    /// A range holding a single offset
    pub const fn single(offset: u64) -> Self {
        Self::new(offset, offset)
    }

    pub fn wraps(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, offset: u64) -> bool {
        if self.wraps() {
            offset >= self.start || offset <= self.end
        } else {
            (self.start..=self.end).contains(&offset)
        }
    }

    /// Whether both bounds are valid offsets of `period`
    pub fn fits(&self, period: u64) -> bool {
        self.start < period && self.end < period
    }

    /// Every offset covered, in ascending order from `start`
    ///
    /// Only meaningful when the range fits the period.
    pub fn offsets(&self, period: u64) -> Box<dyn Iterator<Item = u64>> {
        if self.wraps() {
            Box::new((self.start..period).chain(0..=self.end))
        } else {
            Box::new(self.start..=self.end)
        }
    }
}

impl From<(u64, u64)> for SliceRange {
    fn from((start, end): (u64, u64)) -> Self {
        Self::new(start, end)
    }
}

impl From<SliceRange> for (u64, u64) {
    fn from(range: SliceRange) -> Self {
        (range.start, range.end)
    }
}

impl fmt::Display for SliceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

/// A union of offset ranges
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OffsetSet(pub Vec<SliceRange>);

impl OffsetSet {
    pub fn new(ranges: Vec<SliceRange>) -> Self {
        Self(ranges)
    }

    pub fn contains(&self, offset: u64) -> bool {
        self.0.iter().any(|range| range.contains(offset))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ranges(&self) -> &[SliceRange] {
        &self.0
    }

    /// Offsets covered, range by range (duplicates kept)
    pub fn offsets(&self, period: u64) -> impl Iterator<Item = u64> + '_ {
        self.0.iter().flat_map(move |range| range.offsets(period))
    }
}

impl From<Vec<SliceRange>> for OffsetSet {
    fn from(ranges: Vec<SliceRange>) -> Self {
        Self(ranges)
    }
}

impl fmt::Display for OffsetSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(" "))
    }
}
