//! Clinical metadata for the patient cohort

use crate::error::{GlycoError, Result};

/// Drop the trailing sample-type letter from an ID fragment (`117N` -> `117`)
fn strip_suffix_letter(fragment: &str) -> Option<&str> {
    let mut chars = fragment.char_indices();
    let (last_idx, _) = chars.next_back()?;
    Some(&fragment[..last_idx])
}

/// One patient row of the clinical table
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClinicalRecord {
    /// Normal sample ID fragment, e.g. `117N`
    pub normal: String,
    /// Tumor sample ID fragment, e.g. `118T`
    pub tumor: String,
    /// Viral (EBV) status
    pub ebv: Option<String>,
    /// Microsatellite status
    pub msi: Option<String>,
    pub gender: Option<String>,
    /// Lauren histology
    pub histology: Option<String>,
}

impl ClinicalRecord {
    /// Sample ID in the abundance table convention: `N{normal}T{tumor}` with the
    /// fragments' trailing letters dropped, e.g. `117N` + `118T` -> `N117T118`
    pub fn sample_id(&self) -> Result<String> {
        let normal = strip_suffix_letter(self.normal.trim()).filter(|s| !s.is_empty());
        let tumor = strip_suffix_letter(self.tumor.trim()).filter(|s| !s.is_empty());
        match (normal, tumor) {
            (Some(n), Some(t)) => Ok(format!("N{}T{}", n, t)),
            _ => Err(GlycoError::InvalidClinicalTable {
                reason: format!(
                    "Cannot build sample ID from Normal='{}', Tumor='{}'",
                    self.normal, self.tumor
                ),
            }),
        }
    }
}

/// Clinical metadata table, in input order
#[derive(Debug, Clone, Default)]
pub struct ClinicalTable {
    records: Vec<ClinicalRecord>,
}

impl ClinicalTable {
    pub fn new(records: Vec<ClinicalRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ClinicalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
