//! Peptide filters: missing-data row filter and directional median filter

mod direction;
mod missing;

pub use direction::{direction_filter, passes_direction, GroupMedians};
pub use missing::{filter_by_presence, DEFAULT_MIN_PRESENT};
