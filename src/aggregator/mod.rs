//! Aggregation of classified trace rows into per-seed metrics.
//!
//! This module transforms the rows of a configuration into:
//! - Per-seed accumulators (packet counts, latency, bandwidth, power)
//! - Derived metrics (packet-error rate, throughput, spectral efficiency)
//! - Descriptive distributions for the summary

pub mod metrics;
pub mod seeds;

// Re-export main types and functions
pub use metrics::{
    derive_bandwidth, derive_per, derive_spectral_efficiency, derive_throughput,
    packet_error_rate, Distribution,
};
pub use seeds::{
    aggregate, BandwidthRule, PacketRule, PacketSample, PacketTarget, PowerRule, SampleRule,
    SeedAccumulator,
};
