//! rust_glycodiff: mutation-associated N-glycopeptide differential abundance
//!
//! Finds N-glycopeptides whose abundance is higher in tumors carrying a
//! somatic mutation in a gene of interest than in wild-type tumors, and
//! prepares heatmap, gene-list and clinical annotation tables for plotting.
//!
//! # Example
//!
//! ```ignore
//! use rust_glycodiff::prelude::*;
//!
//! let (abundance, symbols) = read_abundance_table("glycopeptide_change.txt")?;
//! let mutations = read_mutation_table("mutations.tsv")?;
//! let clinical = read_clinical_table("clinical_info.txt")?;
//!
//! let inputs = PipelineInputs { abundance, symbols, mutations, clinical };
//! let output = run_pipeline(&inputs, &PipelineConfig::default())?;
//! println!("{}", output.summary);
//! ```

pub mod annotation;
pub mod cli;
pub mod cohort;
pub mod data;
pub mod error;
pub mod filter;
pub mod io;
pub mod normalization;
pub mod stats;
pub mod testing;
pub mod transform;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::annotation::{build_annotation, AnnotationTable, MutationStatus};
    pub use crate::cohort::{assign_cohorts, CohortAssignment};
    pub use crate::data::{AbundanceMatrix, ClinicalTable, MutationTable, PatientId, PeptideSymbols};
    pub use crate::error::{GlycoError, Result};
    pub use crate::filter::{direction_filter, filter_by_presence, DEFAULT_MIN_PRESENT};
    pub use crate::io::{
        read_abundance_table, read_clinical_table, read_mutation_table, write_annotation,
        write_gene_list, write_matrix, write_peptide_results, write_summary_json, PeptideResults,
        PipelineSummary,
    };
    pub use crate::normalization::quantile_normalize;
    pub use crate::testing::{benjamini_hochberg, compare_peptides, mann_whitney_u};
    pub use crate::transform::{heatmap_matrix, max_abs_scale};
    pub use crate::{run_pipeline, PipelineConfig, PipelineInputs, PipelineOutput};
}

use log::{info, warn};

use prelude::*;
use crate::io::PeptideResult;

/// Default gene of interest
pub const DEFAULT_GENE: &str = "ARID1A";

/// Default p-value threshold for the rank-sum test
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Parsed input tables
#[derive(Debug, Clone)]
pub struct PipelineInputs {
    pub abundance: AbundanceMatrix,
    pub symbols: PeptideSymbols,
    pub mutations: MutationTable,
    pub clinical: ClinicalTable,
}

/// Analysis parameters
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Gene whose mutation defines the mutated cohort
    pub gene: String,
    /// Minimum fraction of non-missing values for a peptide to be kept
    pub min_present: f64,
    /// p-value threshold
    pub alpha: f64,
    /// Fail when a mutated patient has no abundance column
    pub strict_cohort: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            gene: DEFAULT_GENE.to_string(),
            min_present: DEFAULT_MIN_PRESENT,
            alpha: DEFAULT_ALPHA,
            strict_cohort: false,
        }
    }
}

/// Every named intermediate and final product of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Peptides passing the missing-value filter
    pub filtered: AbundanceMatrix,
    /// Quantile-normalized abundance
    pub normalized: AbundanceMatrix,
    pub cohorts: CohortAssignment,
    /// Per-peptide medians, test outcomes and significance
    pub results: PeptideResults,
    /// Scaled, mutated-first matrix of significant peptides
    pub heatmap: AbundanceMatrix,
    /// Gene symbols of significant peptides
    pub gene_symbols: Vec<String>,
    pub annotation: AnnotationTable,
    pub summary: PipelineSummary,
}

/// Medians, direction flags, rank-sum outcomes and BH adjustment for every
/// peptide of the normalized matrix
pub fn peptide_statistics(
    normalized: &AbundanceMatrix,
    symbols: &PeptideSymbols,
    cohorts: &CohortAssignment,
    alpha: f64,
) -> Result<PeptideResults> {
    let wildtype = normalized.select_samples(cohorts.wildtype())?;
    let mutated = normalized.select_samples(cohorts.mutated())?;

    let directions = direction_filter(&wildtype, &mutated);
    let outcomes = compare_peptides(&wildtype, &mutated);

    let pvalues: Vec<f64> = outcomes
        .iter()
        .map(|o| o.pvalue().unwrap_or(f64::NAN))
        .collect();
    let padj = benjamini_hochberg(&pvalues);

    let wt_present = wildtype.present_counts();
    let mt_present = mutated.present_counts();

    let results = normalized
        .peptide_ids()
        .iter()
        .enumerate()
        .map(|(i, peptide)| {
            let (medians, direction_pass) = directions[i];
            let outcome = outcomes[i];
            let significant =
                direction_pass && outcome.pvalue().map_or(false, |p| p < alpha);
            PeptideResult {
                peptide: peptide.clone(),
                symbol: symbols.symbol(peptide).map(str::to_string),
                median_wildtype: medians.wildtype,
                median_mutated: medians.mutated,
                direction_pass,
                n_wildtype: wt_present[i],
                n_mutated: mt_present[i],
                outcome,
                padj: padj[i],
                significant,
            }
        })
        .collect();

    Ok(PeptideResults { results, alpha })
}

/// Run the full analysis: filter, normalize, split cohorts, test, select,
/// scale, and build the gene list and clinical annotation
pub fn run_pipeline(inputs: &PipelineInputs, config: &PipelineConfig) -> Result<PipelineOutput> {
    if !(config.alpha > 0.0 && config.alpha <= 1.0) {
        return Err(GlycoError::InvalidInput {
            reason: format!("alpha must be within (0, 1], got {}", config.alpha),
        });
    }

    // Stage 1: missing-value filter
    let filtered = filter_by_presence(&inputs.abundance, config.min_present)?;

    // Stage 2: quantile normalization
    info!("Quantile-normalizing {} samples...", filtered.n_samples());
    let normalized = quantile_normalize(&filtered)?;

    // Stage 3: cohort assignment
    let mutated_patients = inputs.mutations.mutated_patients(&config.gene)?;
    info!(
        "{} patients carry a {} mutation in the mutation table",
        mutated_patients.len(),
        config.gene
    );
    let cohorts = assign_cohorts(normalized.sample_ids(), &mutated_patients, config.strict_cohort)?;

    // Stage 4-6: medians, rank-sum test, intersection
    let results = peptide_statistics(&normalized, &inputs.symbols, &cohorts, config.alpha)?;
    for (peptide, reason) in results.skipped() {
        warn!("Rank-sum test skipped for {}: {}", peptide, reason.as_str());
    }
    let significant = results.significant_set();
    info!(
        "{} peptides tested, {} significant (p < {} and mt > 0 > wt)",
        results.n_tested(),
        significant.len(),
        config.alpha
    );

    // Stage 7: heatmap matrix
    let significant_rows: Vec<usize> = normalized
        .peptide_ids()
        .iter()
        .enumerate()
        .filter(|(_, p)| significant.contains(p.as_str()))
        .map(|(i, _)| i)
        .collect();
    if significant_rows.is_empty() {
        warn!("No significant peptides; heatmap and gene list will be empty");
    }
    let heatmap = heatmap_matrix(&normalized, &significant_rows, &cohorts)?;

    // Stage 8: gene list
    let gene_symbols = inputs.symbols.symbols_for(&significant);

    // Stage 9: clinical annotation
    let annotation = build_annotation(&inputs.clinical, &cohorts, heatmap.sample_ids())?;

    let summary = PipelineSummary {
        gene: config.gene.clone(),
        alpha: config.alpha,
        min_present: config.min_present,
        input_peptides: inputs.abundance.n_peptides(),
        retained_peptides: filtered.n_peptides(),
        patients: normalized.n_samples(),
        mutated_patients: cohorts.mutated().len(),
        wildtype_patients: cohorts.wildtype().len(),
        unmatched_mutated: cohorts.unmatched().to_vec(),
        tested: results.n_tested(),
        skipped: results.skipped().len(),
        direction_pass: results.direction_pass().len(),
        pvalue_pass: results.pvalue_pass().len(),
        significant: significant.len(),
        gene_symbols: gene_symbols.len(),
        annotated_patients: annotation.len(),
    };

    Ok(PipelineOutput {
        filtered,
        normalized,
        cohorts,
        results,
        heatmap,
        gene_symbols,
        annotation,
        summary,
    })
}
