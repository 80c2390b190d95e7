//! Table readers and delimited-text writers for the analysis
//!
//! Inputs may be tab- or comma-separated text, with the delimiter detected
//! from the header line, or workbooks (`.xls`, `.xlsx`, `.ods`, ...), read
//! from their first worksheet. Outputs for the plotting step are
//! comma-separated, the per-peptide statistics table is tab-separated.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ::csv::{Reader, ReaderBuilder, StringRecord, Trim, Writer, WriterBuilder};
use log::{debug, warn};
use ndarray::Array2;

use super::results::{PeptideResults, PipelineSummary};
use super::spreadsheet::{is_spreadsheet, read_first_sheet};
use crate::annotation::{AnnotationTable, ANNOTATION_ATTRIBUTES};
use crate::data::{
    AbundanceMatrix, ClinicalRecord, ClinicalTable, MutationRecord, MutationTable, PeptideSymbols,
};
use crate::error::{GlycoError, Result};

pub const PEPTIDE_COLUMN: &str = "Peptide";
pub const SYMBOL_COLUMN: &str = "Symbol";
pub const GENE_COLUMN: &str = "Gene";
pub const PATIENT_COLUMN: &str = "Patient";
pub const NORMAL_COLUMN: &str = "Normal";
pub const TUMOR_COLUMN: &str = "Tumor";
pub const EBV_COLUMN: &str = "EBV";
pub const MSI_COLUMN: &str = "MSI";
pub const GENDER_COLUMN: &str = "Gender";
pub const HISTOLOGY_COLUMN: &str = "Histology (Lauren)";

/// Cell values read as missing: pandas' default NA tokens plus a lone `-`
const MISSING_TOKENS: [&str; 20] = [
    "", "-", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether a cell holds a missing-value token
pub fn is_missing(cell: &str) -> bool {
    MISSING_TOKENS.contains(&cell.trim())
}

fn optional_cell(cell: &str) -> Option<String> {
    if is_missing(cell) {
        None
    } else {
        Some(cell.trim().to_string())
    }
}

/// Detect the delimiter from the header line (tab if present, else comma)
fn detect_delimiter(path: &Path) -> Result<u8> {
    let file = File::open(path)?;
    let mut header_line = String::new();
    BufReader::new(file).read_line(&mut header_line)?;
    if header_line.trim().is_empty() {
        return Err(GlycoError::EmptyData {
            reason: format!("Empty table: {}", path.display()),
        });
    }
    Ok(if header_line.contains('\t') { b'\t' } else { b',' })
}

fn open_table(path: &Path) -> Result<Reader<File>> {
    let delimiter = detect_delimiter(path)?;
    let reader = ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(Trim::All)
        .from_path(path)?;
    Ok(reader)
}

/// Header and data rows of one input table, whatever its file format
struct Table {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

fn read_table(path: &Path) -> Result<Table> {
    if is_spreadsheet(path) {
        let (headers, records) = read_first_sheet(path)?;
        return Ok(Table { headers, records });
    }

    let mut reader = open_table(path)?;
    let headers = reader.headers()?.clone();
    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(Table { headers, records })
}

fn column_index(headers: &StringRecord, column: &str, table: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| GlycoError::MissingColumn {
            column: column.to_string(),
            table: table.to_string(),
        })
}

/// Read the glycopeptide abundance table.
///
/// Expected layout: `Peptide`, `Symbol`, then one column per patient sample.
/// Returns the abundance matrix and the peptide to gene symbol mapping.
pub fn read_abundance_table<P: AsRef<Path>>(path: P) -> Result<(AbundanceMatrix, PeptideSymbols)> {
    let Table { headers, records } = read_table(path.as_ref())?;

    let peptide_idx = column_index(&headers, PEPTIDE_COLUMN, "abundance table")?;
    let symbol_idx = column_index(&headers, SYMBOL_COLUMN, "abundance table")?;
    let sample_columns: Vec<usize> = (0..headers.len())
        .filter(|&i| i != peptide_idx && i != symbol_idx)
        .collect();
    let sample_ids: Vec<String> = sample_columns
        .iter()
        .map(|&i| headers[i].to_string())
        .collect();

    if sample_ids.is_empty() {
        return Err(GlycoError::InvalidAbundanceTable {
            reason: "No patient sample columns".to_string(),
        });
    }

    let mut peptide_ids: Vec<String> = Vec::new();
    let mut symbols: Vec<(String, Option<String>)> = Vec::new();
    let mut data: Vec<f64> = Vec::new();
    let mut missing_symbols = 0usize;

    for record in &records {
        let peptide = record[peptide_idx].to_string();
        if is_missing(&peptide) {
            return Err(GlycoError::InvalidAbundanceTable {
                reason: format!("Missing peptide ID on data row {}", peptide_ids.len() + 1),
            });
        }

        let symbol = optional_cell(&record[symbol_idx]);
        if symbol.is_none() {
            missing_symbols += 1;
        }
        symbols.push((peptide.clone(), symbol));

        for &col in &sample_columns {
            let cell = &record[col];
            let value = if is_missing(cell) {
                f64::NAN
            } else {
                cell.parse::<f64>().map_err(|_| GlycoError::InvalidAbundanceTable {
                    reason: format!(
                        "Invalid abundance value '{}' for peptide '{}', sample '{}'",
                        cell, peptide, &headers[col]
                    ),
                })?
            };
            data.push(value);
        }
        peptide_ids.push(peptide);
    }

    if peptide_ids.is_empty() {
        return Err(GlycoError::EmptyData {
            reason: "No peptides found in abundance table".to_string(),
        });
    }
    if missing_symbols > 0 {
        debug!("{} peptides have no gene symbol", missing_symbols);
    }

    let values = Array2::from_shape_vec((peptide_ids.len(), sample_ids.len()), data).map_err(|e| {
        GlycoError::InvalidAbundanceTable {
            reason: e.to_string(),
        }
    })?;

    let matrix = AbundanceMatrix::new(values, peptide_ids, sample_ids)?;
    Ok((matrix, PeptideSymbols::new(symbols)))
}

/// Read the somatic mutation table (workbook or delimited text with `Gene` and
/// `Patient` columns)
pub fn read_mutation_table<P: AsRef<Path>>(path: P) -> Result<MutationTable> {
    let Table { headers, records: rows } = read_table(path.as_ref())?;
    let gene_idx = column_index(&headers, GENE_COLUMN, "mutation table")?;
    let patient_idx = column_index(&headers, PATIENT_COLUMN, "mutation table")?;

    let mut records = Vec::new();
    for (row, record) in rows.iter().enumerate() {
        let gene = &record[gene_idx];
        let patient = &record[patient_idx];
        if is_missing(gene) || is_missing(patient) {
            warn!("Mutation table row {} has no gene or patient; ignored", row + 1);
            continue;
        }
        records.push(MutationRecord {
            patient: patient.to_string(),
            gene: gene.to_string(),
        });
    }

    if records.is_empty() {
        return Err(GlycoError::InvalidMutationTable {
            reason: "No mutation records found".to_string(),
        });
    }

    Ok(MutationTable::new(records))
}

/// Read the clinical metadata table
pub fn read_clinical_table<P: AsRef<Path>>(path: P) -> Result<ClinicalTable> {
    let Table { headers, records: rows } = read_table(path.as_ref())?;
    let table = "clinical table";
    let normal_idx = column_index(&headers, NORMAL_COLUMN, table)?;
    let tumor_idx = column_index(&headers, TUMOR_COLUMN, table)?;
    let ebv_idx = column_index(&headers, EBV_COLUMN, table)?;
    let msi_idx = column_index(&headers, MSI_COLUMN, table)?;
    let gender_idx = column_index(&headers, GENDER_COLUMN, table)?;
    let histology_idx = column_index(&headers, HISTOLOGY_COLUMN, table)?;

    let mut records = Vec::new();
    for record in &rows {
        records.push(ClinicalRecord {
            normal: record[normal_idx].to_string(),
            tumor: record[tumor_idx].to_string(),
            ebv: optional_cell(&record[ebv_idx]),
            msi: optional_cell(&record[msi_idx]),
            gender: optional_cell(&record[gender_idx]),
            histology: optional_cell(&record[histology_idx]),
        });
    }

    if records.is_empty() {
        return Err(GlycoError::InvalidClinicalTable {
            reason: "No patients found in clinical table".to_string(),
        });
    }

    Ok(ClinicalTable::new(records))
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        String::new()
    } else {
        v.to_string()
    }
}

fn comma_writer(path: &Path) -> Result<Writer<File>> {
    Ok(WriterBuilder::new().delimiter(b',').from_path(path)?)
}

/// Write an abundance matrix as CSV (first column `Peptide`, missing cells empty)
pub fn write_matrix<P: AsRef<Path>>(path: P, matrix: &AbundanceMatrix) -> Result<()> {
    let mut writer = comma_writer(path.as_ref())?;

    let mut header = vec![PEPTIDE_COLUMN.to_string()];
    header.extend(matrix.sample_ids().iter().cloned());
    writer.write_record(&header)?;

    for (i, peptide) in matrix.peptide_ids().iter().enumerate() {
        let mut row = vec![peptide.clone()];
        row.extend(matrix.peptide_values(i).iter().map(|&v| format_value(v)));
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the single-column gene symbol list
pub fn write_gene_list<P: AsRef<Path>>(path: P, symbols: &[String]) -> Result<()> {
    let mut writer = comma_writer(path.as_ref())?;
    writer.write_record([SYMBOL_COLUMN])?;
    for symbol in symbols {
        writer.write_record([symbol.as_str()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the annotation table transposed: one row per attribute, one column per patient
pub fn write_annotation<P: AsRef<Path>>(path: P, annotation: &AnnotationTable) -> Result<()> {
    let mut writer = comma_writer(path.as_ref())?;

    let mut header = vec!["Attribute"];
    header.extend(annotation.sample_ids());
    writer.write_record(&header)?;

    for attribute in ANNOTATION_ATTRIBUTES {
        let mut row = vec![attribute];
        row.extend(
            annotation
                .rows
                .iter()
                .map(|r| r.attribute(attribute).unwrap_or("")),
        );
        writer.write_record(&row)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the per-peptide statistics table (tab-separated)
pub fn write_peptide_results<P: AsRef<Path>>(path: P, results: &PeptideResults) -> Result<()> {
    let mut writer = WriterBuilder::new().delimiter(b'\t').from_path(path.as_ref())?;

    writer.write_record([
        "peptide",
        "symbol",
        "median_wildtype",
        "median_mutated",
        "direction_pass",
        "n_wildtype",
        "n_mutated",
        "statistic",
        "pvalue",
        "padj",
        "status",
        "significant",
    ])?;

    for r in &results.results {
        writer.write_record([
            r.peptide.clone(),
            r.symbol.clone().unwrap_or_default(),
            format!("{:.6}", r.median_wildtype),
            format!("{:.6}", r.median_mutated),
            r.direction_pass.to_string(),
            r.n_wildtype.to_string(),
            r.n_mutated.to_string(),
            r.outcome.statistic().map(|s| format!("{}", s)).unwrap_or_default(),
            r.outcome.pvalue().map(|p| format!("{:.6e}", p)).unwrap_or_default(),
            if r.padj.is_nan() { String::new() } else { format!("{:.6e}", r.padj) },
            r.outcome.status().to_string(),
            r.significant.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the run summary as pretty-printed JSON
pub fn write_summary_json<P: AsRef<Path>>(path: P, summary: &PipelineSummary) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, summary)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn test_read_abundance_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Peptide\tSymbol\tN33T34\tN39T40\tN65T66").unwrap();
        writeln!(file, "pepA\tGENE1\t0.5\tNA\t-0.25").unwrap();
        writeln!(file, "pepB\t\t\t1.5\tnan").unwrap();

        let (matrix, symbols) = read_abundance_table(file.path()).unwrap();
        assert_eq!(matrix.n_peptides(), 2);
        assert_eq!(matrix.n_samples(), 3);
        assert_eq!(matrix.sample_ids()[2], "N65T66");
        assert!(matrix.values()[[0, 1]].is_nan());
        assert_eq!(matrix.values()[[1, 1]], 1.5);
        assert_eq!(symbols.entries().len(), 2);
        assert_eq!(symbols.symbol("pepA"), Some("GENE1"));
        assert_eq!(symbols.symbol("pepB"), None);
    }

    #[test]
    fn test_every_missing_token_reads_as_nan() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Peptide\tSymbol\tN3T4\tN5T6").unwrap();
        for (i, token) in MISSING_TOKENS.iter().enumerate() {
            writeln!(file, "pep{}\tG{}\t0.5\t{}", i, i, token).unwrap();
        }

        let (matrix, _) = read_abundance_table(file.path()).unwrap();
        assert_eq!(matrix.n_peptides(), MISSING_TOKENS.len());
        for (i, token) in MISSING_TOKENS.iter().enumerate() {
            assert_eq!(matrix.values()[[i, 0]], 0.5);
            assert!(
                matrix.values()[[i, 1]].is_nan(),
                "token {:?} should read as missing",
                token
            );
        }
    }

    #[test]
    fn test_dash_cell_is_missing() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Peptide\tSymbol\tN1T2\tN3T4").unwrap();
        writeln!(file, "pepA\tG1\t0.5\t-").unwrap();
        let (matrix, _) = read_abundance_table(file.path()).unwrap();
        assert!(matrix.values()[[0, 1]].is_nan());
        assert!(is_missing(" None "));
        assert!(!is_missing("-0.5"));
    }

    #[test]
    fn test_read_abundance_rejects_bad_value() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Peptide,Symbol,s1").unwrap();
        writeln!(file, "pepA,GENE1,abc").unwrap();
        assert!(matches!(
            read_abundance_table(file.path()),
            Err(GlycoError::InvalidAbundanceTable { .. })
        ));
    }

    #[test]
    fn test_read_mutation_table_requires_columns() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Gene,Sample").unwrap();
        writeln!(file, "ARID1A,34T").unwrap();
        assert!(matches!(
            read_mutation_table(file.path()),
            Err(GlycoError::MissingColumn { .. })
        ));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Patient\tGene\tVariant").unwrap();
        writeln!(file, "34T\tARID1A\tp.Q123*").unwrap();
        writeln!(file, "40T\tTP53\tp.R175H").unwrap();
        let table = read_mutation_table(file.path()).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.patients_with("ARID1A"), vec!["34T"]);
    }

    #[test]
    fn test_read_mutation_workbook() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data/somatic_mutations.xlsx");
        let table = read_mutation_table(&path).unwrap();
        // the row without a gene is dropped
        assert_eq!(table.len(), 3);
        assert_eq!(table.patients_with("ARID1A"), vec!["34T", "66T"]);
        assert_eq!(table.patients_with("TP53"), vec!["40T"]);
    }

    #[test]
    fn test_read_clinical_table() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Normal\tTumor\tEBV\tMSI\tGender\tHistology (Lauren)\tAge").unwrap();
        writeln!(file, "33N\t34T\tNegative\tMSS\tM\t\t61").unwrap();
        let table = read_clinical_table(file.path()).unwrap();
        let record = &table.records()[0];
        assert_eq!(record.sample_id().unwrap(), "N33T34");
        assert_eq!(record.histology, None);
        assert_eq!(record.ebv.as_deref(), Some("Negative"));
    }

    #[test]
    fn test_write_outputs() {
        let dir = tempdir().unwrap();
        let matrix = AbundanceMatrix::new(
            ndarray::array![[1.0, f64::NAN], [-0.5, 0.25]],
            vec!["pepA".into(), "pepB".into()],
            vec!["N33T34".into(), "N39T40".into()],
        )
        .unwrap();
        let heatmap = dir.path().join("heatmap.csv");
        write_matrix(&heatmap, &matrix).unwrap();
        let content = std::fs::read_to_string(&heatmap).unwrap();
        assert_eq!(content, "Peptide,N33T34,N39T40\npepA,1,\npepB,-0.5,0.25\n");

        let genes = dir.path().join("genes.csv");
        write_gene_list(&genes, &["GENE1".to_string(), "GENE2".to_string()]).unwrap();
        assert_eq!(std::fs::read_to_string(&genes).unwrap(), "Symbol\nGENE1\nGENE2\n");

        // a missing symbol keeps its line
        write_gene_list(&genes, &["GENE1".to_string(), String::new()]).unwrap();
        assert_eq!(std::fs::read_to_string(&genes).unwrap(), "Symbol\nGENE1\n\"\"\n");
    }

    #[test]
    fn test_write_annotation_transposed() {
        use crate::annotation::{AnnotationRow, MutationStatus};

        let annotation = AnnotationTable {
            rows: vec![
                AnnotationRow {
                    sample_id: "N33T34".to_string(),
                    ebv: Some("EBV-".to_string()),
                    msi: Some("MSS".to_string()),
                    gender: Some("M".to_string()),
                    histology: "Diffuse".to_string(),
                    mutation: MutationStatus::Mutated,
                },
                AnnotationRow {
                    sample_id: "N39T40".to_string(),
                    ebv: None,
                    msi: Some("MSI-H".to_string()),
                    gender: None,
                    histology: "Others".to_string(),
                    mutation: MutationStatus::WildType,
                },
            ],
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("meta.csv");
        write_annotation(&path, &annotation).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "Attribute,N33T34,N39T40\n\
             EBV,EBV-,\n\
             MSI,MSS,MSI-H\n\
             Gender,M,\n\
             Histology,Diffuse,Others\n\
             Mutation,Mut,WT\n"
        );
    }

    #[test]
    fn test_write_peptide_results_table() {
        use crate::io::{PeptideResult, SkipReason, TestOutcome};

        let results = PeptideResults {
            results: vec![
                PeptideResult {
                    peptide: "pepA".to_string(),
                    symbol: Some("GENE1".to_string()),
                    median_wildtype: -0.75,
                    median_mutated: 0.75,
                    direction_pass: true,
                    n_wildtype: 4,
                    n_mutated: 4,
                    outcome: TestOutcome::Tested {
                        statistic: 0.0,
                        pvalue: 2.0 / 70.0,
                    },
                    padj: 0.05,
                    significant: true,
                },
                PeptideResult {
                    peptide: "pepB".to_string(),
                    symbol: None,
                    median_wildtype: f64::NAN,
                    median_mutated: 0.25,
                    direction_pass: false,
                    n_wildtype: 0,
                    n_mutated: 3,
                    outcome: TestOutcome::Skipped(SkipReason::EmptyWildType),
                    padj: f64::NAN,
                    significant: false,
                },
            ],
            alpha: 0.05,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("stats.tsv");
        write_peptide_results(&path, &results).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "peptide\tsymbol\tmedian_wildtype\tmedian_mutated\tdirection_pass\t\
             n_wildtype\tn_mutated\tstatistic\tpvalue\tpadj\tstatus\tsignificant"
        );
        assert_eq!(
            lines[1],
            "pepA\tGENE1\t-0.750000\t0.750000\ttrue\t4\t4\t0\t2.857143e-2\t5.000000e-2\ttested\ttrue"
        );
        assert_eq!(
            lines[2],
            "pepB\t\tNaN\t0.250000\tfalse\t0\t3\t\t\t\tskipped_empty_wildtype\tfalse"
        );
    }

    #[test]
    fn test_write_summary_json_round_trip() {
        let summary = PipelineSummary {
            gene: "ARID1A".to_string(),
            alpha: 0.05,
            min_present: 0.5,
            input_peptides: 10,
            retained_peptides: 8,
            patients: 8,
            mutated_patients: 4,
            wildtype_patients: 4,
            unmatched_mutated: vec!["N249T250".to_string()],
            tested: 7,
            skipped: 1,
            direction_pass: 3,
            pvalue_pass: 2,
            significant: 1,
            gene_symbols: 1,
            annotated_patients: 9,
        };

        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.json");
        write_summary_json(&path, &summary).unwrap();
        let parsed: PipelineSummary =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(parsed.gene, "ARID1A");
        assert_eq!(parsed.retained_peptides, 8);
        assert_eq!(parsed.unmatched_mutated, vec!["N249T250"]);
        assert_eq!(parsed.significant, 1);
        assert_eq!(parsed.annotated_patients, 9);
    }

    #[test]
    fn test_empty_file_is_error() {
        let file = NamedTempFile::new().unwrap();
        assert!(matches!(
            read_clinical_table(file.path()),
            Err(GlycoError::EmptyData { .. })
        ));
    }
}
