//! Trace reading and row representation.
//!
//! This module handles:
//! - Decoding the launcher's CSV header (scenario and seed counts)
//! - Numbering data rows by position
//! - Concatenating the files of one configuration

pub mod schema;
pub mod trace_reader;

// Re-export main types
pub use schema::{Trace, TraceHeader, TraceRow, TraceSet};
pub use trace_reader::{parse_trace, read_trace, read_trace_set};
