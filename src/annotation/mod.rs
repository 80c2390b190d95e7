//! Clinical annotation for the heatmap column bar

use std::collections::HashSet;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::cohort::CohortAssignment;
use crate::data::ClinicalTable;
use crate::error::{GlycoError, Result};

/// Placeholder for patients without a recorded histology
pub const HISTOLOGY_PLACEHOLDER: &str = "Others";

/// Attribute labels of the transposed annotation table, in output order
pub const ANNOTATION_ATTRIBUTES: [&str; 5] = ["EBV", "MSI", "Gender", "Histology", "Mutation"];

/// Mutation status label for a patient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationStatus {
    Mutated,
    WildType,
}

impl MutationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationStatus::Mutated => "Mut",
            MutationStatus::WildType => "WT",
        }
    }
}

/// Collapse viral status labels to `EBV+` / `EBV-`; other labels pass through
pub fn normalize_ebv(label: &str) -> String {
    match label {
        "Negative" => "EBV-".to_string(),
        "EBV" | "EBV(PIK3CAmut)" | "EBV(PIK3CAwt)" => "EBV+".to_string(),
        other => other.to_string(),
    }
}

/// One annotated patient
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationRow {
    pub sample_id: String,
    pub ebv: Option<String>,
    pub msi: Option<String>,
    pub gender: Option<String>,
    pub histology: String,
    pub mutation: MutationStatus,
}

impl AnnotationRow {
    /// Value for one of [`ANNOTATION_ATTRIBUTES`]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "EBV" => self.ebv.as_deref(),
            "MSI" => self.msi.as_deref(),
            "Gender" => self.gender.as_deref(),
            "Histology" => Some(self.histology.as_str()),
            "Mutation" => Some(self.mutation.as_str()),
            _ => None,
        }
    }
}

/// Annotation rows ordered to match the heatmap columns
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnotationTable {
    pub rows: Vec<AnnotationRow>,
}

impl AnnotationTable {
    pub fn sample_ids(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.sample_id.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reshape clinical metadata into the heatmap annotation.
///
/// Rows follow `column_order` (the heatmap columns) first; clinical patients
/// not in the heatmap follow, mutated before wild-type, in table order.
pub fn build_annotation(
    clinical: &ClinicalTable,
    cohorts: &CohortAssignment,
    column_order: &[String],
) -> Result<AnnotationTable> {
    let mut rows: Vec<AnnotationRow> = Vec::with_capacity(clinical.len());
    let mut seen: HashSet<String> = HashSet::new();

    for record in clinical.records() {
        let sample_id = record.sample_id()?;
        if !seen.insert(sample_id.clone()) {
            return Err(GlycoError::InvalidClinicalTable {
                reason: format!("Duplicate sample ID '{}'", sample_id),
            });
        }

        let mutation = if cohorts.is_mutated(&sample_id) {
            MutationStatus::Mutated
        } else {
            MutationStatus::WildType
        };

        rows.push(AnnotationRow {
            sample_id,
            ebv: record.ebv.as_deref().map(normalize_ebv),
            msi: record.msi.clone(),
            gender: record.gender.clone(),
            histology: record
                .histology
                .clone()
                .unwrap_or_else(|| HISTOLOGY_PLACEHOLDER.to_string()),
            mutation,
        });
    }

    let mut ordered: Vec<AnnotationRow> = Vec::with_capacity(rows.len());
    let mut missing: Vec<&str> = Vec::new();
    for column in column_order {
        match rows.iter().position(|r| &r.sample_id == column) {
            Some(idx) => ordered.push(rows.remove(idx)),
            None => missing.push(column.as_str()),
        }
    }
    if !missing.is_empty() {
        warn!(
            "{} heatmap columns have no clinical record: {}",
            missing.len(),
            missing.join(", ")
        );
    }

    let (rest_mut, rest_wt): (Vec<AnnotationRow>, Vec<AnnotationRow>) = rows
        .into_iter()
        .partition(|r| r.mutation == MutationStatus::Mutated);
    ordered.extend(rest_mut);
    ordered.extend(rest_wt);

    let n_mut = ordered
        .iter()
        .filter(|r| r.mutation == MutationStatus::Mutated)
        .count();
    info!(
        "Annotated {} patients ({} Mut, {} WT)",
        ordered.len(),
        n_mut,
        ordered.len() - n_mut
    );

    Ok(AnnotationTable { rows: ordered })
}
