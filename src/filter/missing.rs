//! Drop peptides with too many missing abundance values

use log::info;

use crate::data::AbundanceMatrix;
use crate::error::{GlycoError, Result};

/// Minimum fraction of patients with a value for a peptide to be kept
pub const DEFAULT_MIN_PRESENT: f64 = 0.5;

/// Keep peptides whose fraction of non-missing values is at least `min_present`.
///
/// A row exactly at the threshold is kept. Kept rows are not modified.
pub fn filter_by_presence(matrix: &AbundanceMatrix, min_present: f64) -> Result<AbundanceMatrix> {
    if !(0.0..=1.0).contains(&min_present) {
        return Err(GlycoError::InvalidInput {
            reason: format!("min_present must be within [0, 1], got {}", min_present),
        });
    }

    let n_samples = matrix.n_samples();
    if n_samples == 0 {
        return Err(GlycoError::EmptyData {
            reason: "Abundance matrix has no sample columns".to_string(),
        });
    }

    let keep: Vec<usize> = matrix
        .present_counts()
        .iter()
        .enumerate()
        .filter(|(_, &present)| present as f64 / n_samples as f64 >= min_present)
        .map(|(i, _)| i)
        .collect();

    info!(
        "Kept {} of {} peptides with >= {:.0}% non-missing values",
        keep.len(),
        matrix.n_peptides(),
        min_present * 100.0
    );

    if keep.is_empty() {
        return Err(GlycoError::EmptyData {
            reason: "No peptides passed the missing-value filter".to_string(),
        });
    }

    matrix.subset_peptides(&keep)
}
