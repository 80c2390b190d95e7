//! Normalization of glycopeptide abundance data

mod quantile;

pub use quantile::{quantile_normalize, quantile_normalize_values, reference_distribution};
