//! Command-line interface for rust_glycodiff

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "rust_glycodiff")]
#[command(author = "SunJu Kim")]
#[command(version)]
#[command(about = "Mutation-associated N-glycopeptide differential abundance analysis")]
#[command(disable_help_flag = true)]
#[command(disable_version_flag = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full mutated vs wild-type analysis
    #[command(
        about = "Run the full mutated vs wild-type analysis",
        long_about = "Run the full mutated vs wild-type analysis\n\n\
            Filters peptides with too many missing values, quantile-normalizes the\n\
            abundance matrix, splits patients by mutation status of the chosen gene,\n\
            runs a Wilcoxon rank-sum test per peptide and keeps peptides that are\n\
            significant and up in the mutated cohort (mutated median > 0 > wild-type median).\n\n\
            Writes the heatmap matrix, the gene symbol list and the clinical annotation.",
        after_long_help = "\
Examples:
  # Defaults reproduce the ARID1A analysis with the standard file names
  rust_glycodiff run

  # Another gene, strict cohort mapping, per-peptide statistics
  rust_glycodiff run --gene TP53 --strict-cohort \\
    --heatmap-output tp53_heatmap.csv --results-output tp53_stats.tsv"
    )]
    Run {
        /// Glycopeptide abundance table
        #[arg(short, long, default_value = "glycopeptide_change.txt",
            long_help = "Glycopeptide abundance table.\n\
                Columns: Peptide, Symbol, then one log-ratio column per patient sample.\n\
                Tab or comma delimited (auto-detected), or a workbook.")]
        abundance: String,

        /// Somatic mutation table
        #[arg(short, long, default_value = "SuppleTable_SomaticMutation_80_nonsyn.xls",
            long_help = "Non-synonymous somatic mutation table.\n\
                Workbooks (.xls, .xlsx, .xlsm, .xlsb, .ods) are read from the first sheet;\n\
                other files as tab or comma delimited text.\n\
                Must contain Gene and Patient columns; Patient IDs look like 118T.")]
        mutations: String,

        /// Clinical metadata table
        #[arg(short, long, default_value = "clinical_info.txt",
            long_help = "Clinical metadata table.\n\
                Must contain Normal, Tumor, EBV, MSI, Gender and Histology (Lauren) columns.")]
        clinical: String,

        /// Gene whose mutation defines the mutated cohort [default: ARID1A]
        #[arg(short, long, default_value = "ARID1A")]
        gene: String,

        /// Minimum fraction of non-missing values per peptide [default: 0.5]
        #[arg(long, default_value = "0.5")]
        min_present: f64,

        /// Rank-sum p-value threshold [default: 0.05]
        #[arg(long, default_value = "0.05")]
        alpha: f64,

        /// Fail when a mutated patient has no abundance column
        #[arg(long,
            long_help = "Fail instead of warning when a mutated patient from the mutation\n\
                table maps to a sample ID that is not an abundance column.")]
        strict_cohort: bool,

        /// Heatmap matrix output
        #[arg(long, default_value = "arid1a_glyco_heatmapinput.csv")]
        heatmap_output: String,

        /// Gene symbol list output
        #[arg(long, default_value = "arid1a_symbol_glyco.csv")]
        genes_output: String,

        /// Clinical annotation output
        #[arg(long, default_value = "arid1a_glyco_patient_meta.csv")]
        annotation_output: String,

        /// Per-peptide statistics table (optional)
        #[arg(long)]
        results_output: Option<String>,

        /// Run summary as JSON (optional)
        #[arg(long)]
        summary_json: Option<String>,
    },

    /// Filter and quantile-normalize the abundance table only
    #[command(
        long_about = "Filter peptides by missing values and quantile-normalize the\n\
            abundance table across patient samples.",
        after_long_help = "\
Examples:
  rust_glycodiff normalize -a glycopeptide_change.txt -o normalized.csv"
    )]
    Normalize {
        /// Glycopeptide abundance table
        #[arg(short, long, default_value = "glycopeptide_change.txt")]
        abundance: String,

        /// Output file path
        #[arg(short, long, default_value = "glycopeptide_normalized.csv")]
        output: String,

        /// Minimum fraction of non-missing values per peptide [default: 0.5]
        #[arg(long, default_value = "0.5")]
        min_present: f64,
    },
}
