//! Output writers for analysis reports.
//!
//! This module handles writing data to disk in various formats:
//! - JSON reports (pretty)
//! - Long-format CSV for plotting
//! - Text summaries for the terminal

pub mod export;
pub mod json;
pub mod summary;

// Re-export main functions
pub use export::{write_csv, write_groups};
pub use json::{read_report, report_to_string, write_report};
pub use summary::render_summary;
