//! Per-column max-abs scaling into [-1, 1]
//! Equivalent of scikit-learn's `MaxAbsScaler().fit_transform`

use ndarray::{Array2, ArrayView2, Axis};

use crate::cohort::CohortAssignment;
use crate::data::AbundanceMatrix;
use crate::error::Result;

/// Divide every column by its largest absolute non-missing value.
///
/// A column whose scale is zero or undefined (all missing) is left as is.
pub fn max_abs_scale_values(values: ArrayView2<f64>) -> Array2<f64> {
    let mut scaled = values.to_owned();
    for mut col in scaled.axis_iter_mut(Axis(1)) {
        let scale = col
            .iter()
            .filter(|v| !v.is_nan())
            .fold(0.0_f64, |acc, v| acc.max(v.abs()));
        if scale > 0.0 {
            col.mapv_inplace(|v| v / scale);
        }
    }
    scaled
}

/// Max-abs scale every sample column of an abundance matrix
pub fn max_abs_scale(matrix: &AbundanceMatrix) -> Result<AbundanceMatrix> {
    matrix.with_values(max_abs_scale_values(matrix.values()))
}

/// Heatmap input: the given peptides, columns reordered mutated-first, then
/// scaled per column. An empty peptide list yields a matrix with no rows.
pub fn heatmap_matrix(
    normalized: &AbundanceMatrix,
    peptide_indices: &[usize],
    cohorts: &CohortAssignment,
) -> Result<AbundanceMatrix> {
    let ordered = normalized
        .subset_peptides(peptide_indices)?
        .select_samples(&cohorts.ordered_columns())?;
    max_abs_scale(&ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_every_column_max_abs_is_one() {
        let values = array![[0.5, -4.0, 0.1], [-2.0, 1.0, 0.3], [1.0, 2.0, -0.2]];
        let scaled = max_abs_scale_values(values.view());
        for col in scaled.axis_iter(Axis(1)) {
            let max_abs = col.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
            assert!((max_abs - 1.0).abs() < 1e-12);
        }
        assert!((scaled[[0, 0]] - 0.25).abs() < 1e-12);
        assert!((scaled[[0, 1]] - -1.0).abs() < 1e-12);
    }

    #[test]
    fn test_heatmap_matrix_orders_mutated_first() {
        use crate::cohort::assign_cohorts;
        use crate::data::PatientId;

        let matrix = AbundanceMatrix::new(
            array![[-1.0, 2.0, -0.5], [0.2, 0.4, 0.1], [-2.0, 4.0, -1.0]],
            vec!["p1".into(), "p2".into(), "p3".into()],
            vec!["N33T34".into(), "N39T40".into(), "N65T66".into()],
        )
        .unwrap();
        let mutated: Vec<PatientId> = vec!["40T".parse().unwrap()];
        let cohorts = assign_cohorts(matrix.sample_ids(), &mutated, false).unwrap();

        let heatmap = heatmap_matrix(&matrix, &[0, 2], &cohorts).unwrap();
        assert_eq!(heatmap.peptide_ids(), &["p1".to_string(), "p3".to_string()]);
        assert_eq!(heatmap.sample_ids()[0], "N39T40");
        assert!((heatmap.values()[[0, 0]] - 0.5).abs() < 1e-12);
        assert!((heatmap.values()[[1, 0]] - 1.0).abs() < 1e-12);
        assert!((heatmap.values()[[1, 1]] - -1.0).abs() < 1e-12);

        let empty = heatmap_matrix(&matrix, &[], &cohorts).unwrap();
        assert_eq!(empty.n_peptides(), 0);
        assert_eq!(empty.n_samples(), 3);
    }

    #[test]
    fn test_missing_and_zero_columns() {
        let nan = f64::NAN;
        let values = array![[nan, 0.0], [2.0, 0.0], [-4.0, nan]];
        let scaled = max_abs_scale_values(values.view());
        assert!(scaled[[0, 0]].is_nan());
        assert!((scaled[[2, 0]] - -1.0).abs() < 1e-12);
        assert_eq!(scaled[[0, 1]], 0.0);
        assert!(scaled[[2, 1]].is_nan());
    }
}
