//! Slices, allocation strategies and the position classifier.

use super::ranges::OffsetSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Logical sub-allocation of the shared spectrum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Slice {
    A,
    B,
    C,
}

impl Slice {
    pub const ALL: [Slice; 3] = [Slice::A, Slice::B, Slice::C];

    /// Zero-based index (A = 0)
    pub fn index(self) -> usize {
        match self {
            Slice::A => 0,
            Slice::B => 1,
            Slice::C => 2,
        }
    }
}

impl fmt::Display for Slice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slice::A => "A",
            Slice::B => "B",
            Slice::C => "C",
        };
        f.write_str(name)
    }
}

impl FromStr for Slice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Slice::A),
            "B" => Ok(Slice::B),
            "C" => Ok(Slice::C),
            other => Err(format!("unknown slice '{}', expected A, B or C", other)),
        }
    }
}

impl TryFrom<String> for Slice {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Channel-allocation strategy of a simulation run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One channel shared by every station
    SingleChannel,
    /// Fixed sub-band per slice
    Static,
    /// Per-slice allocation updated during the run
    Dynamic,
}

impl Strategy {
    pub fn label(self) -> &'static str {
        match self {
            Strategy::SingleChannel => "Single channel",
            Strategy::Static => "Static slicing",
            Strategy::Dynamic => "Dynamic slicing",
        }
    }

    /// Short identifier used in layout names
    pub fn key(self) -> &'static str {
        match self {
            Strategy::SingleChannel => "single",
            Strategy::Static => "static",
            Strategy::Dynamic => "dynamic",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of classifying one data row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    SliceA,
    SliceB,
    SliceC,
    Discard,
}

impl Classification {
    pub fn slice(self) -> Option<Slice> {
        match self {
            Classification::SliceA => Some(Slice::A),
            Classification::SliceB => Some(Slice::B),
            Classification::SliceC => Some(Slice::C),
            Classification::Discard => None,
        }
    }
}

impl From<Slice> for Classification {
    fn from(slice: Slice) -> Self {
        match slice {
            Slice::A => Classification::SliceA,
            Slice::B => Classification::SliceB,
            Slice::C => Classification::SliceC,
        }
    }
}

/// Offsets of the three slices within one super-frame
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SliceAssignment {
    pub slice_a: OffsetSet,
    pub slice_b: OffsetSet,
    pub slice_c: OffsetSet,
}

impl SliceAssignment {
    pub fn get(&self, slice: Slice) -> &OffsetSet {
        match slice {
            Slice::A => &self.slice_a,
            Slice::B => &self.slice_b,
            Slice::C => &self.slice_c,
        }
    }

    /// First slice (A, then B, then C) whose ranges contain `offset`
    pub fn classify_offset(&self, offset: u64) -> Classification {
        Slice::ALL
            .into_iter()
            .find(|slice| self.get(*slice).contains(offset))
            .map_or(Classification::Discard, Classification::from)
    }
}

/// Super-frame offset of a row position
///
/// Euclidean, so every integer position maps into `[0, period)`.
/// A zero period has no offsets and yields `None`.
pub fn frame_offset(position: i64, period: u64, position_base: i64) -> Option<u64> {
    if period == 0 {
        return None;
    }

    let shifted = i128::from(position) - i128::from(position_base);
    let offset = shifted.rem_euclid(i128::from(period));

    u64::try_from(offset).ok()
}

/// Classify a row by its 1-based position
///
/// **Public** - pure and total: every integer position gets exactly one outcome
///
/// # Arguments
/// * `position` - Row position within the data rows
/// * `period` - Rows per super-frame
/// * `position_base` - Shift absorbing the layout's header skip
/// * `assignment` - Slice ranges over `[0, period)`
pub fn classify(
    position: i64,
    period: u64,
    position_base: i64,
    assignment: &SliceAssignment,
) -> Classification {
    frame_offset(position, period, position_base)
        .map_or(Classification::Discard, |offset| {
            assignment.classify_offset(offset)
        })
}
