//! Report schema for assembled metrics.
//!
//! This module defines the structure of the JSON report written to disk.
//! Schema is versioned to allow future evolution.

use crate::classifier::{Slice, Strategy};
use crate::parser::TraceHeader;
use crate::utils::config::Constants;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Derived metrics of one seed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeedMetrics {
    /// Zero-based seed index within the configuration's file set
    pub seed: usize,

    /// Station rows of the analyzed slice
    pub rows: usize,

    pub tx_packets: f64,
    pub rx_packets: f64,

    /// One packet-error rate per station row of the slice
    pub per: Vec<f64>,

    /// Latency of every slice row that received packets
    pub latency: Vec<f64>,

    /// Throughput of the analyzed slice
    pub slice_throughput_mbps: f64,

    /// Throughput of every station in the network
    pub throughput_mbps: f64,

    /// Occupied bandwidth
    pub bandwidth_mhz: f64,

    /// Network throughput over occupied bandwidth
    pub spectral_efficiency: f64,

    /// Transmit power samples of the analyzed slice
    pub tx_power_dbm: Vec<f64>,
}

/// Everything derived from one configuration's file set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    /// Configuration label, e.g. `2-100-6`
    pub label: String,

    pub strategy: Strategy,
    pub mobility: bool,

    /// Layout the rows were classified with
    pub layout: String,

    pub slice: Slice,
    pub files: Vec<PathBuf>,

    /// Combined header of the file set
    pub header: TraceHeader,

    pub seeds: Vec<SeedMetrics>,
}

impl RunMetrics {
    /// Per-row packet-error rates across all seeds, in seed order
    pub fn per(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds.iter().flat_map(|seed| seed.per.iter().copied())
    }

    pub fn latency(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds.iter().flat_map(|seed| seed.latency.iter().copied())
    }

    pub fn throughput(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds.iter().map(|seed| seed.throughput_mbps)
    }

    pub fn slice_throughput(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds.iter().map(|seed| seed.slice_throughput_mbps)
    }

    pub fn spectral_efficiency(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds.iter().map(|seed| seed.spectral_efficiency)
    }

    pub fn tx_power(&self) -> impl Iterator<Item = f64> + '_ {
        self.seeds
            .iter()
            .flat_map(|seed| seed.tx_power_dbm.iter().copied())
    }
}

/// Metrics of every configuration sharing a strategy and mobility condition
///
/// Values are concatenated in configuration order; positions line up with
/// `configurations` for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyResult {
    pub mobility: bool,
    pub strategy: Strategy,

    /// Configuration labels, in the order their values were appended
    pub configurations: Vec<String>,

    pub per: Vec<f64>,
    pub latency: Vec<f64>,
    pub throughput_mbps: Vec<f64>,
    pub slice_throughput_mbps: Vec<f64>,
    pub spectral_efficiency: Vec<f64>,
    pub tx_power_dbm: Vec<f64>,
}

impl StrategyResult {
    pub fn new(mobility: bool, strategy: Strategy) -> Self {
        Self {
            mobility,
            strategy,
            configurations: Vec::new(),
            per: Vec::new(),
            latency: Vec::new(),
            throughput_mbps: Vec::new(),
            slice_throughput_mbps: Vec::new(),
            spectral_efficiency: Vec::new(),
            tx_power_dbm: Vec::new(),
        }
    }

    /// Heading used by the summary, e.g. `Dynamic slicing (mobility)`
    pub fn title(&self) -> String {
        let condition = if self.mobility { "mobility" } else { "no mobility" };
        format!("{} ({})", self.strategy, condition)
    }
}

/// Top-level report written to JSON
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Schema version for compatibility checking
    pub version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Slice the packet metrics were computed for
    pub slice: Slice,

    pub constants: Constants,

    /// Assembled results, one group per (mobility, strategy)
    pub groups: Vec<StrategyResult>,

    /// Per-configuration detail
    pub runs: Vec<RunMetrics>,
}
