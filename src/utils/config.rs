//! Configuration and constants for the analysis pipeline.

use serde::{Deserialize, Serialize};

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Trace layout written by the simulator launcher:
// row 1 = scenario count, row 2 = seed count, rows 3-5 = notes and argument dumps
pub const DEFAULT_HEADER_ROWS: usize = 5;
pub const SCENARIO_ROW: usize = 0;
pub const SEED_ROW: usize = 1;
pub const HEADER_VALUE_FIELD: usize = 1;
pub const MIN_HEADER_ROWS: usize = SEED_ROW + 1;

// Column positions (0-based) inside a station row
pub const ALLOCATION_COLUMN: usize = 1;
pub const TX_PACKETS_COLUMN: usize = 3;
pub const RX_PACKETS_COLUMN: usize = 4;
pub const LATENCY_COLUMN: usize = 5;

// UDP payload used by every client application in the simulations
pub const DEFAULT_PACKET_SIZE_BYTES: u32 = 1472;
pub const BITS_PER_BYTE: f64 = 8.0;
pub const DEFAULT_SIMULATION_TIME_S: f64 = 15.0;
pub const BITS_PER_MEGABIT: f64 = 1_000_000.0;

// Single-channel runs occupy the whole 160 MHz channel for the full run
pub const SINGLE_CHANNEL_BANDWIDTH_MHZ: f64 = 160.0;
pub const DEFAULT_TX_POWER_DBM: f64 = 20.0;

// Dynamic slicing: one initial channel group plus one group per update
pub const DYNAMIC_CHANNEL_GROUPS: u64 = 15;
pub const CHANNEL_GROUP_ROWS: u64 = 4;
pub const DYNAMIC_POWER_COLUMN: usize = 4;

/// Station shapes (slice A, B, C) of the reference batches
pub const REFERENCE_SHAPES: &[(u64, u64, u64)] = &[(2, 100, 6), (4, 100, 4), (6, 100, 2)];

/// Process-wide constants shared by every run of a batch.
///
/// Set once when the batch is loaded and only ever passed by reference.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Constants {
    /// Payload carried by one packet
    pub packet_size_bytes: u32,

    /// Simulated time of one seed run
    pub simulation_time_s: f64,

    /// Rows preceding the first data row of a trace
    pub header_rows: usize,
}

impl Default for Constants {
    fn default() -> Self {
        Self {
            packet_size_bytes: DEFAULT_PACKET_SIZE_BYTES,
            simulation_time_s: DEFAULT_SIMULATION_TIME_S,
            header_rows: DEFAULT_HEADER_ROWS,
        }
    }
}

impl Constants {
    /// Bits carried by one packet
    pub fn packet_bits(&self) -> f64 {
        f64::from(self.packet_size_bytes) * BITS_PER_BYTE
    }
}
