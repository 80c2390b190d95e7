//! Workbook input: the first worksheet of an Excel or OpenDocument file

use std::path::Path;

use ::csv::StringRecord;
use calamine::{open_workbook_auto, Data, Reader};
use log::debug;

use crate::error::{GlycoError, Result};

const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xls", "xlsx", "xlsm", "xlsb", "ods"];

/// Whether a path names a workbook (by extension, case-insensitive)
pub fn is_spreadsheet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SPREADSHEET_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        other => other.to_string(),
    }
}

/// Read the first worksheet as a header record plus data records.
///
/// Every cell is rendered as text so the rows go through the same parsing as
/// delimited tables; empty cells become empty strings.
pub fn read_first_sheet(path: &Path) -> Result<(StringRecord, Vec<StringRecord>)> {
    let mut workbook = open_workbook_auto(path)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| GlycoError::EmptyData {
            reason: format!("No worksheet in {}", path.display()),
        })??;

    let mut rows = range.rows();
    let headers: StringRecord = rows
        .next()
        .ok_or_else(|| GlycoError::EmptyData {
            reason: format!("Empty worksheet: {}", path.display()),
        })?
        .iter()
        .map(cell_to_string)
        .collect();
    if headers.iter().all(str::is_empty) {
        return Err(GlycoError::EmptyData {
            reason: format!("Empty header row: {}", path.display()),
        });
    }

    let records: Vec<StringRecord> = rows
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    debug!(
        "Read {} rows x {} columns from {}",
        records.len(),
        headers.len(),
        path.display()
    );

    Ok((headers, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
    }

    #[test]
    fn test_is_spreadsheet_by_extension() {
        assert!(is_spreadsheet(Path::new("SuppleTable_SomaticMutation_80_nonsyn.xls")));
        assert!(is_spreadsheet(Path::new("mutations.XLSX")));
        assert!(is_spreadsheet(Path::new("mutations.ods")));
        assert!(!is_spreadsheet(Path::new("mutations.tsv")));
        assert!(!is_spreadsheet(Path::new("mutations")));
    }

    #[test]
    fn test_read_first_sheet_renders_cells_as_text() {
        let (headers, records) = read_first_sheet(&fixture("somatic_mutations.xlsx")).unwrap();
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec!["Patient", "Gene", "Position", "Variant"]
        );
        assert_eq!(records.len(), 4);
        assert_eq!(&records[0][0], "34T");
        assert_eq!(&records[0][2], "27023");
        assert_eq!(&records[2][3], "");
        assert_eq!(&records[3][1], "");
    }

    #[test]
    fn test_corrupt_workbook_is_spreadsheet_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.xls");
        let mut file = std::fs::File::create(&path).unwrap();
        // OLE2 compound document signature followed by garbage
        file.write_all(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
            .unwrap();
        file.write_all(&[0xFF; 64]).unwrap();
        drop(file);

        assert!(matches!(
            read_first_sheet(&path),
            Err(GlycoError::SpreadsheetError(_))
        ));
    }
}
