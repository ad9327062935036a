//! Result assembly and the report schema.
//!
//! Run metrics are grouped per strategy and mobility condition and
//! concatenated in configuration order, ready for the presentation layer.

pub mod grouping;
pub mod schema;

// Re-export main types
pub use grouping::assemble;
pub use schema::{Report, RunMetrics, SeedMetrics, StrategyResult};
