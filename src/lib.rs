//! Slice Trace Metrics
//!
//! Decoding and aggregation of the CSV traces written by Wi-Fi slicing
//! simulations. Every data row is classified into slice A, B or C (or
//! discarded) from its position inside a periodic super-frame, rows are
//! split into seed blocks, and per-seed packet-error rate, latency,
//! throughput and spectral efficiency are derived and grouped per
//! allocation strategy and mobility condition.
//!
//! This crate provides the core implementation for the
//! `slice-metrics` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! slice-metrics layouts --show
//! slice-metrics analyze --batch batch.toml --output report.json --summary
//! ```
//!
//! Library callers usually go through [`batch::load_batch`] and
//! [`batch::run_batch`].

pub mod aggregator;
pub mod assembly;
pub mod batch;
pub mod classifier;
pub mod commands;
pub mod output;
pub mod parser;
pub mod utils;
