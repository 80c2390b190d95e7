//! Input/Output operations for the glycopeptide analysis

mod csv;
mod results;
mod spreadsheet;

pub use self::csv::{
    is_missing, read_abundance_table, read_clinical_table, read_mutation_table, write_annotation,
    write_gene_list, write_matrix, write_peptide_results, write_summary_json,
};
pub use results::{PeptideResult, PeptideResults, PipelineSummary, SkipReason, TestOutcome};
