//! rust_glycodiff command-line interface

use clap::Parser;
use log::{info, LevelFilter};

use rust_glycodiff::cli::{Cli, Commands};
use rust_glycodiff::prelude::*;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() {
    let args: Vec<String> = std::env::args().collect();

    // Find the first non-flag argument (potential subcommand)
    let first_positional = args.iter().skip(1).find(|a| !a.starts_with('-'));
    let subcommands = ["run", "normalize", "help"];
    let has_subcommand = first_positional.map_or(false, |a| subcommands.contains(&a.as_str()));

    if !has_subcommand {
        if args.len() == 1 {
            print_no_args();
            return;
        }
        if args.iter().any(|a| a == "--help" || a == "-h") {
            print_help();
            return;
        }
        if args.iter().any(|a| a == "-V" || a == "--version") {
            println!("rust_glycodiff {}", VERSION);
            return;
        }
        print_no_args();
        return;
    }

    let cli = Cli::parse();

    let log_level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .format_timestamp(None)
        .init();

    let result = match cli.command {
        Some(Commands::Run {
            abundance,
            mutations,
            clinical,
            gene,
            min_present,
            alpha,
            strict_cohort,
            heatmap_output,
            genes_output,
            annotation_output,
            results_output,
            summary_json,
        }) => {
            let config = PipelineConfig {
                gene,
                min_present,
                alpha,
                strict_cohort,
            };
            let outputs = OutputPaths {
                heatmap: heatmap_output,
                genes: genes_output,
                annotation: annotation_output,
                results: results_output,
                summary_json,
            };
            run_analysis(&abundance, &mutations, &clinical, &config, &outputs)
        }
        Some(Commands::Normalize {
            abundance,
            output,
            min_present,
        }) => run_normalize(&abundance, &output, min_present),
        None => {
            print_no_args();
            return;
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

// ---------------------------------------------------------------------------
// Custom help output
// ---------------------------------------------------------------------------

fn print_no_args() {
    println!("rust_glycodiff v{}", VERSION);
    println!("Run `rust_glycodiff --help` for usage.");
}

fn print_help() {
    println!("rust_glycodiff v{}", VERSION);
    println!("Mutation-associated N-glycopeptide differential abundance analysis");
    println!();
    println!("Usage: rust_glycodiff <COMMAND> [OPTIONS]");
    println!();
    println!("Commands:");
    println!("  run        Mutated vs wild-type analysis with heatmap, gene list and annotation output");
    println!("  normalize  Missing-value filter and quantile normalization only");
    println!();
    println!("Global Options:");
    println!("  -v, --verbose    Enable verbose output");
    println!("  -h, --help       Print help");
    println!("  -V, --version    Print version");
    println!();
    println!("Examples:");
    println!("  rust_glycodiff run");
    println!("  rust_glycodiff run --gene TP53 --results-output tp53_stats.tsv");
    println!("  rust_glycodiff normalize -a glycopeptide_change.txt -o normalized.csv");
    println!();
    println!("Run `rust_glycodiff <COMMAND> --help` for command-specific options.");
}

// ---------------------------------------------------------------------------
// Subcommand implementations
// ---------------------------------------------------------------------------

struct OutputPaths {
    heatmap: String,
    genes: String,
    annotation: String,
    results: Option<String>,
    summary_json: Option<String>,
}

fn run_analysis(
    abundance_path: &str,
    mutations_path: &str,
    clinical_path: &str,
    config: &PipelineConfig,
    outputs: &OutputPaths,
) -> Result<()> {
    info!("Loading abundance table from: {}", abundance_path);
    let (abundance, symbols) = read_abundance_table(abundance_path)?;
    info!("  {} peptides, {} samples", abundance.n_peptides(), abundance.n_samples());

    info!("Loading mutation table from: {}", mutations_path);
    let mutations = read_mutation_table(mutations_path)?;
    info!("  {} mutation records", mutations.len());

    info!("Loading clinical metadata from: {}", clinical_path);
    let clinical = read_clinical_table(clinical_path)?;
    info!("  {} patients", clinical.len());

    let inputs = PipelineInputs {
        abundance,
        symbols,
        mutations,
        clinical,
    };
    let output = run_pipeline(&inputs, config)?;

    info!("Writing heatmap input to: {}", outputs.heatmap);
    write_matrix(&outputs.heatmap, &output.heatmap)?;

    info!("Writing gene symbols to: {}", outputs.genes);
    write_gene_list(&outputs.genes, &output.gene_symbols)?;

    info!("Writing patient annotation to: {}", outputs.annotation);
    write_annotation(&outputs.annotation, &output.annotation)?;

    if let Some(path) = &outputs.results {
        info!("Writing per-peptide statistics to: {}", path);
        write_peptide_results(path, &output.results)?;
    }

    if let Some(path) = &outputs.summary_json {
        info!("Writing run summary to: {}", path);
        write_summary_json(path, &output.summary)?;
    }

    println!("\n{}", output.summary);
    Ok(())
}

fn run_normalize(abundance_path: &str, output_path: &str, min_present: f64) -> Result<()> {
    info!("Loading abundance table from: {}", abundance_path);
    let (abundance, _) = read_abundance_table(abundance_path)?;
    info!("  {} peptides, {} samples", abundance.n_peptides(), abundance.n_samples());

    let filtered = filter_by_presence(&abundance, min_present)?;
    let normalized = quantile_normalize(&filtered)?;

    info!("Writing normalized matrix to: {}", output_path);
    write_matrix(output_path, &normalized)?;

    info!("Done!");
    Ok(())
}
