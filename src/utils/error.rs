//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or decoding a trace file
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Cannot read trace {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed CSV in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Trace {} has {found} rows, expected at least {expected} header rows", path.display())]
    MissingHeader {
        path: PathBuf,
        found: usize,
        expected: usize,
    },

    #[error("Trace {}: {header_rows} header rows cannot hold the scenario and seed counts, at least {required} needed", path.display())]
    HeaderRowsTooFew {
        path: PathBuf,
        header_rows: usize,
        required: usize,
    },

    #[error("Trace {} header row {row}: expected a positive integer, found '{value}'", path.display())]
    InvalidHeaderValue {
        path: PathBuf,
        row: usize,
        value: String,
    },

    #[error("Trace {} row {position}: column {column} is missing", path.display())]
    MissingField {
        path: PathBuf,
        position: u64,
        column: usize,
    },

    #[error("Trace {} row {position}: column {column} is not numeric ('{value}')", path.display())]
    InvalidField {
        path: PathBuf,
        position: u64,
        column: usize,
        value: String,
    },

    #[error("Trace {} row {position}: zero transmitted packets, packet error rate is undefined", path.display())]
    ZeroTransmission { path: PathBuf, position: u64 },

    #[error("Trace {} reports {found} scenarios but the file set started with {expected}", path.display())]
    ScenarioMismatch {
        path: PathBuf,
        expected: u64,
        found: u64,
    },

    #[error("No trace files given")]
    EmptyFileSet,
}

/// Errors raised while splitting selected rows into seed blocks
#[derive(Error, Debug, PartialEq)]
pub enum AggregationError {
    #[error("{rows} selected rows cannot be split evenly across {seeds} seeds")]
    UnevenSeedBlocks { rows: usize, seeds: u64 },

    #[error("Seed {seed} of run '{run}' has no allocated bandwidth")]
    ZeroBandwidth { run: String, seed: usize },
}

/// Errors raised while loading or validating layouts and batch files
#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Layout '{layout}': period must be at least 1")]
    ZeroPeriod { layout: String },

    #[error("Layout '{layout}': period {period} exceeds the maximum of {max}")]
    PeriodTooLarge { layout: String, period: u64, max: u64 },

    #[error("Layout '{layout}': range [{start}, {end}] exceeds period {period}")]
    RangeOutOfBounds {
        layout: String,
        start: u64,
        end: u64,
        period: u64,
    },

    #[error("Layout '{layout}': offset {offset} belongs to both {first} and {second}")]
    Overlap {
        layout: String,
        offset: u64,
        first: String,
        second: String,
    },

    #[error("Layout '{layout}': offset {offset} is not assigned to any slice or ignored range")]
    Gap { layout: String, offset: u64 },

    #[error("Layout '{layout}': {reason}")]
    StrategyMismatch { layout: String, reason: String },

    #[error("Layout '{layout}': marker offset {offset} is not an ignored row")]
    MarkerOutsideIgnored { layout: String, offset: u64 },

    #[error("Station shape {shape}: {reason}")]
    InvalidShape { shape: String, reason: String },

    #[error("Unknown layout '{0}'")]
    UnknownLayout(String),

    #[error("Duplicate layout '{0}'")]
    DuplicateLayout(String),

    #[error("Run '{run}': {reason}")]
    InvalidRun { run: String, reason: String },

    #[error("Invalid constant: {0}")]
    InvalidConstant(String),

    #[error("Batch TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Any failure of the read → classify → aggregate → derive pipeline
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Aggregation(#[from] AggregationError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    CsvFailed(#[from] csv::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
