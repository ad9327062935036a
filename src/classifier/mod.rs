//! Slice classification of trace rows.
//!
//! This module handles:
//! - Offset ranges over one super-frame, including wrapping ranges
//! - The pure position classifier
//! - Data-driven frame layouts, their validation and the reference table

pub mod layout;
pub mod presets;
pub mod ranges;
pub mod slice;
pub mod table;

// Re-export main types
pub use layout::{BandwidthSource, FrameLayout, PowerSource};
pub use presets::StationShape;
pub use ranges::{OffsetSet, SliceRange};
pub use slice::{classify, frame_offset, Classification, Slice, SliceAssignment, Strategy};
pub use table::LayoutTable;
