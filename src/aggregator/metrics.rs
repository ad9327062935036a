//! Derive packet-error rate, throughput, bandwidth and spectral efficiency.
//!
//! All conversions use the batch constants: one packet carries
//! `packet_size_bytes` of payload and every seed run lasts
//! `simulation_time_s` seconds.

use super::seeds::{PacketSample, SeedAccumulator};
use crate::classifier::{BandwidthSource, Strategy};
use crate::utils::config::{Constants, BITS_PER_MEGABIT};
use serde::{Deserialize, Serialize};

/// Fraction of transmitted packets that were lost
///
/// Rows with no transmissions are rejected when they are accumulated, so
/// `tx` is always positive here.
pub fn packet_error_rate(sample: &PacketSample) -> f64 {
    (sample.tx - sample.rx) / sample.tx
}

/// Per-row packet-error rates of a seed, one value per selected row
pub fn derive_per(acc: &SeedAccumulator) -> Vec<f64> {
    acc.packet_samples.iter().map(packet_error_rate).collect()
}

/// Throughput in Mbit/s of `rx_packets` received over one seed run
pub fn derive_throughput(rx_packets: f64, constants: &Constants) -> f64 {
    rx_packets * constants.packet_bits() / (constants.simulation_time_s * BITS_PER_MEGABIT)
}

/// Occupied bandwidth in MHz of one seed
///
/// **Public** - used by the batch runner for the spectral efficiency
///
/// # Arguments
/// * `acc` - Accumulator of the bandwidth rule (ignored for fixed sources)
/// * `source` - Where the layout keeps its bandwidth
/// * `strategy` - Dynamic runs sample the allocation on every update and are
///   normalized by the run duration; the others already hold a rate
/// * `constants` - Batch constants
pub fn derive_bandwidth(
    acc: &SeedAccumulator,
    source: &BandwidthSource,
    strategy: Strategy,
    constants: &Constants,
) -> f64 {
    let raw = match source {
        BandwidthSource::Fixed { mhz } => *mhz,
        BandwidthSource::Markers { .. } => acc.bandwidth_units,
    };

    match (strategy, source) {
        (Strategy::Dynamic, BandwidthSource::Markers { .. }) => raw / constants.simulation_time_s,
        _ => raw,
    }
}

/// Throughput per unit of bandwidth (bit/s/Hz)
///
/// Callers check for a zero bandwidth first.
pub fn derive_spectral_efficiency(throughput_mbps: f64, bandwidth_mhz: f64) -> f64 {
    throughput_mbps / bandwidth_mhz
}

/// Descriptive summary of a sample collection
///
/// **Public** - used by the text summary of the analyze command
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Distribution {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub median: f64,
    pub max: f64,
}

impl Distribution {
    pub fn from_samples(samples: &[f64]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut sorted = samples.to_vec();
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mid = count / 2;
        let median = if count % 2 == 0 {
            (sorted[mid - 1] + sorted[mid]) / 2.0
        } else {
            sorted[mid]
        };

        Self {
            count,
            mean: sorted.iter().sum::<f64>() / count as f64,
            min: sorted[0],
            median,
            max: sorted[count - 1],
        }
    }

    /// Get human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "n={} | mean {:.4} | min {:.4} | median {:.4} | max {:.4}",
            self.count, self.mean, self.min, self.median, self.max
        )
    }
}
