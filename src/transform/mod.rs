//! Heatmap-oriented transforms of the abundance matrix

mod scaling;

pub use scaling::{heatmap_matrix, max_abs_scale, max_abs_scale_values};
