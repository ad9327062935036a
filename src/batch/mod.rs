//! Batch analysis: load a TOML batch and evaluate every run.

pub mod config;
pub mod runner;

pub use config::{load_batch, parse_batch, Batch, BatchConfig, RunConfig};
pub use runner::{evaluate_run, run_batch};
