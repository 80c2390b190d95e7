//! Quantile normalization across patient samples

use std::cmp::Ordering;

use ndarray::{Array1, Array2, ArrayView2, Axis};

use crate::data::AbundanceMatrix;
use crate::error::{GlycoError, Result};
use crate::stats::interpolate_sorted;

/// Position of the `t`-th of `k` sorted values on a reference of length `n`
fn reference_position(t: usize, k: usize, n: usize) -> f64 {
    if k <= 1 {
        (n as f64 - 1.0) / 2.0
    } else {
        t as f64 * (n as f64 - 1.0) / (k as f64 - 1.0)
    }
}

/// Sorted non-missing values of every column
fn sorted_columns(values: ArrayView2<f64>) -> Vec<Vec<f64>> {
    values
        .axis_iter(Axis(1))
        .map(|col| {
            let mut present: Vec<f64> = col.iter().copied().filter(|v| !v.is_nan()).collect();
            present.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
            present
        })
        .collect()
}

/// Common reference distribution: mean of each column's quantile function
/// evaluated at `n_rows` evenly spaced positions.
///
/// Columns with fewer non-missing values are interpolated up to the full length.
pub fn reference_distribution(values: ArrayView2<f64>) -> Array1<f64> {
    let n = values.nrows();
    let columns: Vec<Vec<f64>> = sorted_columns(values)
        .into_iter()
        .filter(|c| !c.is_empty())
        .collect();

    let mut reference = Array1::from_elem(n, f64::NAN);
    if columns.is_empty() {
        return reference;
    }

    for i in 0..n {
        let sum: f64 = columns
            .iter()
            .map(|col| {
                // map reference slot i (of n) onto this column's k values
                let pos = if n <= 1 {
                    0.0
                } else {
                    i as f64 * (col.len() as f64 - 1.0) / (n as f64 - 1.0)
                };
                interpolate_sorted(col, pos)
            })
            .sum();
        reference[i] = sum / columns.len() as f64;
    }

    reference
}

/// Quantile-normalize a peptides x samples matrix so that every sample column
/// shares the same value distribution. Missing values stay missing; tied
/// values get the mean of the reference values at their positions.
pub fn quantile_normalize_values(values: ArrayView2<f64>) -> Array2<f64> {
    let (n, n_samples) = values.dim();
    let reference = reference_distribution(values);
    let reference = reference.to_vec();

    let mut normalized = Array2::from_elem((n, n_samples), f64::NAN);

    for (j, col) in values.axis_iter(Axis(1)).enumerate() {
        let mut present: Vec<(usize, f64)> = col
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .collect();
        present.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

        let k = present.len();
        let mut start = 0;
        while start < k {
            let mut end = start + 1;
            while end < k && present[end].1 == present[start].1 {
                end += 1;
            }

            let tied_mean = (start..end)
                .map(|t| interpolate_sorted(&reference, reference_position(t, k, n)))
                .sum::<f64>()
                / (end - start) as f64;

            for &(row, _) in &present[start..end] {
                normalized[[row, j]] = tied_mean;
            }
            start = end;
        }
    }

    normalized
}

/// Quantile-normalize an abundance matrix across its sample columns
pub fn quantile_normalize(matrix: &AbundanceMatrix) -> Result<AbundanceMatrix> {
    if matrix.n_peptides() == 0 || matrix.n_samples() == 0 {
        return Err(GlycoError::EmptyData {
            reason: "Cannot quantile-normalize an empty abundance matrix".to_string(),
        });
    }

    let normalized = quantile_normalize_values(matrix.values());
    log::debug!(
        "Quantile-normalized {} peptides across {} samples",
        matrix.n_peptides(),
        matrix.n_samples()
    );
    matrix.with_values(normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn sorted_column(values: &Array2<f64>, j: usize) -> Vec<f64> {
        let mut col: Vec<f64> = values.column(j).iter().copied().filter(|v| !v.is_nan()).collect();
        col.sort_by(|a, b| a.partial_cmp(b).unwrap());
        col
    }

    #[test]
    fn test_columns_share_sorted_shape() {
        let values = array![
            [5.0, 4.0, 3.0],
            [2.0, 1.0, 4.0],
            [3.0, 4.5, 6.0],
            [4.0, 2.0, 8.0],
        ];
        let normalized = quantile_normalize_values(values.view());

        let first = sorted_column(&normalized, 0);
        for j in 1..3 {
            let other = sorted_column(&normalized, j);
            for (a, b) in first.iter().zip(other.iter()) {
                assert!((a - b).abs() < 1e-12, "column {} differs: {:?} vs {:?}", j, first, other);
            }
        }

        // reference = mean of sorted columns
        let expected = [2.0, 3.0, 14.0 / 3.0, 17.5 / 3.0];
        for (a, b) in first.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rank_order_preserved_within_column() {
        let values = array![[0.3, -1.0], [-0.2, 0.5], [1.1, 0.1]];
        let normalized = quantile_normalize_values(values.view());
        for j in 0..2 {
            for a in 0..3 {
                for b in 0..3 {
                    if values[[a, j]] < values[[b, j]] {
                        assert!(normalized[[a, j]] < normalized[[b, j]]);
                    }
                }
            }
        }
    }

    #[test]
    fn test_missing_values_stay_missing() {
        let values = array![[1.0, f64::NAN], [2.0, 5.0], [3.0, 6.0]];
        let normalized = quantile_normalize_values(values.view());
        assert!(normalized[[0, 1]].is_nan());
        assert!(normalized.iter().filter(|v| v.is_nan()).count() == 1);
        // two present values of column 1 land on the reference extremes
        assert!((normalized[[1, 1]] - normalized[[0, 0]]).abs() < 1e-12);
        assert!((normalized[[2, 1]] - normalized[[2, 0]]).abs() < 1e-12);
    }

    #[test]
    fn test_ties_get_mean_reference_value() {
        let values = array![[1.0, 10.0], [1.0, 20.0], [2.0, 30.0]];
        let normalized = quantile_normalize_values(values.view());
        // reference = [5.5, 10.5, 16.0]
        assert!((normalized[[0, 0]] - 8.0).abs() < 1e-12);
        assert!((normalized[[1, 0]] - 8.0).abs() < 1e-12);
        assert!((normalized[[2, 0]] - 16.0).abs() < 1e-12);
    }
}
