//! Per-peptide statistical testing between the two cohorts

mod fdr;
mod rank_sum;

pub use fdr::benjamini_hochberg;
pub use rank_sum::{mann_whitney_u, RankSumMethod, RankSumResult, EXACT_MAX_SIZE};

use log::debug;

use crate::data::AbundanceMatrix;
use crate::io::{SkipReason, TestOutcome};
use crate::stats::present_values;

/// Rank-sum test of one peptide's wild-type values against its mutated values.
///
/// Missing values are dropped per cohort first; a peptide left with an empty
/// cohort is reported as skipped.
pub fn compare_peptide(wildtype: &[f64], mutated: &[f64]) -> TestOutcome {
    let wt = present_values(wildtype);
    let mt = present_values(mutated);

    match (wt.is_empty(), mt.is_empty()) {
        (true, true) => TestOutcome::Skipped(SkipReason::EmptyBoth),
        (true, false) => TestOutcome::Skipped(SkipReason::EmptyWildType),
        (false, true) => TestOutcome::Skipped(SkipReason::EmptyMutated),
        (false, false) => match mann_whitney_u(&wt, &mt) {
            Some(res) => TestOutcome::Tested {
                statistic: res.statistic,
                pvalue: res.pvalue,
            },
            None => TestOutcome::Skipped(SkipReason::EmptyBoth),
        },
    }
}

/// Test every peptide (row) of the wild-type matrix against the same row of
/// the mutated matrix
pub fn compare_peptides(wildtype: &AbundanceMatrix, mutated: &AbundanceMatrix) -> Vec<TestOutcome> {
    (0..wildtype.n_peptides())
        .map(|i| {
            let wt: Vec<f64> = wildtype.peptide_values(i).to_vec();
            let mt: Vec<f64> = mutated.peptide_values(i).to_vec();
            let outcome = compare_peptide(&wt, &mt);
            debug!("{}: {:?}", wildtype.peptide_ids()[i], outcome);
            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_values_dropped_before_test() {
        let nan = f64::NAN;
        let outcome = compare_peptide(&[-0.9, nan, -0.8, -0.7, -0.6], &[0.6, 0.7, nan, 0.8, 0.9]);
        let p = outcome.pvalue().unwrap();
        assert!((p - 2.0 / 70.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group_is_skipped() {
        let nan = f64::NAN;
        assert_eq!(
            compare_peptide(&[nan, nan], &[0.1, 0.2]),
            TestOutcome::Skipped(SkipReason::EmptyWildType)
        );
        assert_eq!(
            compare_peptide(&[0.1], &[nan]),
            TestOutcome::Skipped(SkipReason::EmptyMutated)
        );
        assert_eq!(
            compare_peptide(&[nan], &[nan]),
            TestOutcome::Skipped(SkipReason::EmptyBoth)
        );
    }
}
