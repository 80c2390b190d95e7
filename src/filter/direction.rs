//! Directional filter on cohort medians

use serde::{Deserialize, Serialize};

use crate::data::AbundanceMatrix;
use crate::stats::nan_median;

/// Per-peptide medians of the two cohorts (NaN when a cohort has no values)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupMedians {
    pub wildtype: f64,
    pub mutated: f64,
}

/// Up in the mutated cohort, down in the wild-type cohort.
/// NaN medians compare false, so a peptide with an empty cohort fails.
pub fn passes_direction(medians: &GroupMedians) -> bool {
    medians.mutated > 0.0 && medians.wildtype < 0.0
}

/// Medians and direction flag for every peptide (row) of the two cohort matrices
pub fn direction_filter(
    wildtype: &AbundanceMatrix,
    mutated: &AbundanceMatrix,
) -> Vec<(GroupMedians, bool)> {
    (0..wildtype.n_peptides())
        .map(|i| {
            let medians = GroupMedians {
                wildtype: nan_median(wildtype.peptide_values(i).iter()),
                mutated: nan_median(mutated.peptide_values(i).iter()),
            };
            (medians, passes_direction(&medians))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_passes_direction() {
        assert!(passes_direction(&GroupMedians { wildtype: -0.1, mutated: 0.2 }));
        assert!(!passes_direction(&GroupMedians { wildtype: 0.1, mutated: 0.2 }));
        assert!(!passes_direction(&GroupMedians { wildtype: -0.1, mutated: 0.0 }));
        assert!(!passes_direction(&GroupMedians { wildtype: -0.1, mutated: f64::NAN }));
    }

    #[test]
    fn test_direction_filter_per_row() {
        let nan = f64::NAN;
        let wt = AbundanceMatrix::new(
            array![[-0.2, 0.0, nan], [0.3, 0.1, 0.2]],
            vec!["p1".into(), "p2".into()],
            vec!["w1".into(), "w2".into(), "w3".into()],
        )
        .unwrap();
        let mt = AbundanceMatrix::new(
            array![[0.1, 0.3], [0.4, 0.5]],
            vec!["p1".into(), "p2".into()],
            vec!["m1".into(), "m2".into()],
        )
        .unwrap();

        let flags = direction_filter(&wt, &mt);
        assert!((flags[0].0.wildtype - -0.1).abs() < 1e-12);
        assert!((flags[0].0.mutated - 0.2).abs() < 1e-12);
        assert!(flags[0].1);
        assert!(!flags[1].1);
    }
}
