//! Trace file reader.
//!
//! Decodes the comma-separated traces written by the simulator launcher:
//!
//! ```text
//! scenarios,1
//! seeds per scenario,20
//! notes,<free text>
//! arg_list[0],<argument dump>
//! arg_list[19],<argument dump>
//! <data row 1>
//! <data row 2>
//! ...
//! ```
//!
//! Header rows are skipped by count, never by content. Data rows are kept
//! raw; numeric validation happens when a rule selects a row, because the
//! simulator interleaves text rows (channel configuration headings) with the
//! station rows.

use super::schema::{Trace, TraceHeader, TraceRow, TraceSet};
use crate::utils::config::{HEADER_VALUE_FIELD, MIN_HEADER_ROWS, SCENARIO_ROW, SEED_ROW};
use crate::utils::error::FormatError;
use csv::{ReaderBuilder, StringRecord, Trim};
use log::{debug, info};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Read and decode a trace file
///
/// **Public** - main entry point for reading
///
/// # Arguments
/// * `path` - Trace file path
/// * `header_rows` - Rows preceding the first data row (5 for launcher output)
///
/// # Errors
/// * `FormatError::Io` - file cannot be opened
/// * `FormatError::HeaderRowsTooFew` - `header_rows` leaves no room for the counts
/// * `FormatError::MissingHeader` - fewer rows than the header needs
/// * `FormatError::InvalidHeaderValue` - scenario/seed count is not a positive integer
pub fn read_trace(path: impl AsRef<Path>, header_rows: usize) -> Result<Trace, FormatError> {
    let path = path.as_ref();

    debug!("Reading trace: {}", path.display());

    let file = File::open(path).map_err(|source| FormatError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_trace(path, file, header_rows)
}

/// Decode a trace from any reader
///
/// **Public** - lets callers decode in-memory traces; `path` only labels errors
pub fn parse_trace<R: Read>(
    path: &Path,
    reader: R,
    header_rows: usize,
) -> Result<Trace, FormatError> {
    if header_rows < MIN_HEADER_ROWS {
        return Err(FormatError::HeaderRowsTooFew {
            path: path.to_path_buf(),
            header_rows,
            required: MIN_HEADER_ROWS,
        });
    }

    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let mut header_records: Vec<StringRecord> = Vec::with_capacity(header_rows);
    let mut rows = Vec::new();

    for result in csv_reader.records() {
        let record = result.map_err(|source| FormatError::Csv {
            path: path.to_path_buf(),
            source,
        })?;

        if header_records.len() < header_rows {
            header_records.push(record);
        } else {
            let position = rows.len() as u64 + 1;
            rows.push(TraceRow::new(position, record));
        }
    }

    if header_records.len() < header_rows {
        return Err(FormatError::MissingHeader {
            path: path.to_path_buf(),
            found: header_records.len(),
            expected: header_rows,
        });
    }

    let header = TraceHeader {
        scenario_count: parse_header_value(path, SCENARIO_ROW, &header_records[SCENARIO_ROW])?,
        seed_count: parse_header_value(path, SEED_ROW, &header_records[SEED_ROW])?,
    };

    debug!(
        "Trace {}: {} scenario(s), {} seed(s), {} data rows",
        path.display(),
        header.scenario_count,
        header.seed_count,
        rows.len()
    );

    Ok(Trace {
        path: path.to_path_buf(),
        header,
        rows,
    })
}

/// Parse the count stored in the second field of a header row
///
/// **Private** - internal helper for parse_trace
fn parse_header_value(
    path: &Path,
    row: usize,
    record: &StringRecord,
) -> Result<u64, FormatError> {
    let raw = record.get(HEADER_VALUE_FIELD).unwrap_or("");

    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => Ok(value),
        _ => Err(FormatError::InvalidHeaderValue {
            path: path.to_path_buf(),
            row: row + 1,
            value: raw.to_string(),
        }),
    }
}

/// Read every file of one configuration and concatenate them
///
/// **Public** - used by the batch runner
///
/// All files must agree on the scenario count; seed counts add up, so the
/// seed blocks of the combined stream line up with the files' own seeds.
/// The first failing file fails the whole set.
pub fn read_trace_set(paths: &[PathBuf], header_rows: usize) -> Result<TraceSet, FormatError> {
    let (first, rest) = paths.split_first().ok_or(FormatError::EmptyFileSet)?;

    let first = read_trace(first, header_rows)?;
    let mut header = first.header;
    let mut traces = vec![first];

    for path in rest {
        let trace = read_trace(path, header_rows)?;

        if trace.header.scenario_count != header.scenario_count {
            return Err(FormatError::ScenarioMismatch {
                path: path.clone(),
                expected: header.scenario_count,
                found: trace.header.scenario_count,
            });
        }

        header.seed_count += trace.header.seed_count;
        traces.push(trace);
    }

    let set = TraceSet { header, traces };

    info!(
        "Loaded {} file(s): {} data rows, {} seed(s)",
        set.traces.len(),
        set.len(),
        set.header.seed_count
    );

    Ok(set)
}
