//! In-memory representation of a decoded trace.
//!
//! A trace is read once and never mutated afterwards. Every value the
//! downstream stages need is reached through these types, in particular the
//! `TraceHeader` is carried explicitly instead of being remembered from the
//! last file that happened to be parsed.

use crate::utils::error::FormatError;
use csv::StringRecord;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Scenario and seed counts from the first two trace rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Independent scenarios in the trace (row 1)
    pub scenario_count: u64,

    /// Repeated seeds per scenario (row 2)
    pub seed_count: u64,
}

/// One data row of a trace
#[derive(Debug, Clone)]
pub struct TraceRow {
    /// 1-based ordinal within the data rows (header rows excluded)
    pub position: u64,

    /// Raw fields, untouched
    pub record: StringRecord,
}

impl TraceRow {
    pub fn new(position: u64, record: StringRecord) -> Self {
        Self { position, record }
    }

    /// Raw text of a column, if present
    pub fn raw(&self, column: usize) -> Option<&str> {
        self.record.get(column)
    }

    /// Parse a column as a number
    ///
    /// **Public** - used by the sample rules once a row has been selected
    ///
    /// # Errors
    /// * `FormatError::MissingField` - the row is shorter than `column + 1`
    /// * `FormatError::InvalidField` - the field is not a finite number
    pub fn numeric(&self, path: &Path, column: usize) -> Result<f64, FormatError> {
        let raw = self.raw(column).ok_or_else(|| FormatError::MissingField {
            path: path.to_path_buf(),
            position: self.position,
            column,
        })?;

        match raw.trim().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(FormatError::InvalidField {
                path: path.to_path_buf(),
                position: self.position,
                column,
                value: raw.to_string(),
            }),
        }
    }
}

/// A fully decoded trace file
#[derive(Debug, Clone)]
pub struct Trace {
    pub path: PathBuf,
    pub header: TraceHeader,
    pub rows: Vec<TraceRow>,
}

impl Trace {
    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// The logically concatenated traces of one configuration
///
/// Positions stay per file: each file restarts at 1 because the layout's
/// position base absorbs the per-file header skip.
#[derive(Debug, Clone)]
pub struct TraceSet {
    /// Combined header (shared scenario count, summed seed count)
    pub header: TraceHeader,
    pub traces: Vec<Trace>,
}

impl TraceSet {
    /// Iterate every data row in concatenated order, with its source trace
    pub fn rows(&self) -> impl Iterator<Item = (&Trace, &TraceRow)> {
        self.traces
            .iter()
            .flat_map(|trace| trace.rows.iter().map(move |row| (trace, row)))
    }

    /// Total data rows across all files
    pub fn len(&self) -> usize {
        self.traces.iter().map(Trace::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Trace> for TraceSet {
    fn from(trace: Trace) -> Self {
        Self {
            header: trace.header,
            traces: vec![trace],
        }
    }
}
