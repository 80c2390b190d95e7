//! Per-peptide results and run summary

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Which cohort had no non-missing values for a peptide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    EmptyWildType,
    EmptyMutated,
    EmptyBoth,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::EmptyWildType => "skipped_empty_wildtype",
            SkipReason::EmptyMutated => "skipped_empty_mutated",
            SkipReason::EmptyBoth => "skipped_empty_both",
        }
    }
}

/// Outcome of the rank-sum test for one peptide
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TestOutcome {
    Tested { statistic: f64, pvalue: f64 },
    Skipped(SkipReason),
}

impl TestOutcome {
    pub fn pvalue(&self) -> Option<f64> {
        match self {
            TestOutcome::Tested { pvalue, .. } => Some(*pvalue),
            TestOutcome::Skipped(_) => None,
        }
    }

    pub fn statistic(&self) -> Option<f64> {
        match self {
            TestOutcome::Tested { statistic, .. } => Some(*statistic),
            TestOutcome::Skipped(_) => None,
        }
    }

    pub fn is_tested(&self) -> bool {
        matches!(self, TestOutcome::Tested { .. })
    }

    pub fn status(&self) -> &'static str {
        match self {
            TestOutcome::Tested { .. } => "tested",
            TestOutcome::Skipped(reason) => reason.as_str(),
        }
    }
}

/// Statistics for one peptide
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeptideResult {
    pub peptide: String,
    pub symbol: Option<String>,
    /// Median of non-missing wild-type values (NaN when none)
    pub median_wildtype: f64,
    /// Median of non-missing mutated values (NaN when none)
    pub median_mutated: f64,
    /// Mutated median > 0 and wild-type median < 0
    pub direction_pass: bool,
    pub n_wildtype: usize,
    pub n_mutated: usize,
    pub outcome: TestOutcome,
    /// BH-adjusted p-value over tested peptides (NaN when skipped)
    pub padj: f64,
    /// Passes both the direction and the p-value criterion
    pub significant: bool,
}

/// Results for every peptide that survived row filtering, in matrix row order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeptideResults {
    pub results: Vec<PeptideResult>,
    pub alpha: f64,
}

impl PeptideResults {
    pub fn n_peptides(&self) -> usize {
        self.results.len()
    }

    /// Peptides passing the directional filter
    pub fn direction_pass(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.direction_pass)
            .map(|r| r.peptide.as_str())
            .collect()
    }

    /// Tested peptides with p < alpha
    pub fn pvalue_pass(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.outcome.pvalue().map_or(false, |p| p < self.alpha))
            .map(|r| r.peptide.as_str())
            .collect()
    }

    /// Significant peptides, in matrix row order
    pub fn significant_peptides(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| r.significant)
            .map(|r| r.peptide.as_str())
            .collect()
    }

    pub fn significant_set(&self) -> HashSet<&str> {
        self.significant_peptides().into_iter().collect()
    }

    pub fn n_tested(&self) -> usize {
        self.results.iter().filter(|r| r.outcome.is_tested()).count()
    }

    /// Peptides whose test was skipped, with the reason
    pub fn skipped(&self) -> Vec<(&str, SkipReason)> {
        self.results
            .iter()
            .filter_map(|r| match r.outcome {
                TestOutcome::Skipped(reason) => Some((r.peptide.as_str(), reason)),
                TestOutcome::Tested { .. } => None,
            })
            .collect()
    }
}

/// Summary of one pipeline run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineSummary {
    pub gene: String,
    pub alpha: f64,
    pub min_present: f64,
    pub input_peptides: usize,
    pub retained_peptides: usize,
    pub patients: usize,
    pub mutated_patients: usize,
    pub wildtype_patients: usize,
    /// Mutated patients from the mutation table with no abundance column
    pub unmatched_mutated: Vec<String>,
    pub tested: usize,
    pub skipped: usize,
    pub direction_pass: usize,
    pub pvalue_pass: usize,
    pub significant: usize,
    pub gene_symbols: usize,
    pub annotated_patients: usize,
}

impl std::fmt::Display for PipelineSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} Glycopeptide Summary", self.gene)?;
        writeln!(f, "==========================")?;
        writeln!(
            f,
            "Peptides: {} loaded, {} retained (>= {:.0}% present)",
            self.input_peptides,
            self.retained_peptides,
            self.min_present * 100.0
        )?;
        writeln!(
            f,
            "Patients: {} ({} mutated, {} wild-type)",
            self.patients, self.mutated_patients, self.wildtype_patients
        )?;
        if !self.unmatched_mutated.is_empty() {
            writeln!(f, "  Unmatched mutated IDs: {}", self.unmatched_mutated.join(", "))?;
        }
        writeln!(f, "Tested: {} (skipped: {})", self.tested, self.skipped)?;
        writeln!(f, "  Direction (mt > 0, wt < 0): {}", self.direction_pass)?;
        writeln!(f, "  p < {}: {}", self.alpha, self.pvalue_pass)?;
        writeln!(f, "Significant: {}", self.significant)?;
        writeln!(f, "Gene symbols written: {}", self.gene_symbols)?;
        writeln!(f, "Annotated patients: {}", self.annotated_patients)?;
        Ok(())
    }
}
