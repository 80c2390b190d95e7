//! Cohort assignment: mutated vs wild-type patient samples
//!
//! Mutation-table patient IDs are mapped onto abundance column names and the
//! mapping is validated. The resulting [`CohortAssignment`] is the one place
//! the mutated set is defined; the statistics and the clinical annotation
//! both read it from here.

use std::collections::HashSet;

use log::{info, warn};

use crate::data::PatientId;
use crate::error::{GlycoError, Result};

/// Partition of abundance columns into mutated and wild-type cohorts
#[derive(Debug, Clone, PartialEq)]
pub struct CohortAssignment {
    /// Mutated sample columns, in abundance column order
    mutated: Vec<String>,
    /// Wild-type sample columns, in abundance column order
    wildtype: Vec<String>,
    /// Mapped IDs of mutated patients without an abundance column
    unmatched: Vec<String>,
}

impl CohortAssignment {
    pub fn mutated(&self) -> &[String] {
        &self.mutated
    }

    pub fn wildtype(&self) -> &[String] {
        &self.wildtype
    }

    pub fn unmatched(&self) -> &[String] {
        &self.unmatched
    }

    /// Whether a sample ID belongs to a patient with the mutation, whether or
    /// not it has an abundance column
    pub fn is_mutated(&self, sample_id: &str) -> bool {
        self.mutated.iter().any(|s| s == sample_id) || self.unmatched.iter().any(|s| s == sample_id)
    }

    /// Column order used for the heatmap: mutated cohort first, then wild-type
    pub fn ordered_columns(&self) -> Vec<String> {
        self.mutated
            .iter()
            .chain(self.wildtype.iter())
            .cloned()
            .collect()
    }
}

/// Assign abundance columns to cohorts.
///
/// Every mutated patient is mapped to its abundance column name. A mapped
/// name with no matching column is reported; with `strict` it is an error.
/// Both cohorts must end up non-empty.
pub fn assign_cohorts(
    sample_ids: &[String],
    mutated_patients: &[PatientId],
    strict: bool,
) -> Result<CohortAssignment> {
    let mapped: Vec<String> = mutated_patients.iter().map(PatientId::sample_column).collect();
    let mapped_set: HashSet<&str> = mapped.iter().map(|s| s.as_str()).collect();
    let columns: HashSet<&str> = sample_ids.iter().map(|s| s.as_str()).collect();

    let mut unmatched: Vec<String> = Vec::new();
    for (patient, column) in mutated_patients.iter().zip(mapped.iter()) {
        if !columns.contains(column.as_str()) && !unmatched.contains(column) {
            warn!(
                "Mutated patient '{}' maps to '{}', which is not an abundance column",
                patient, column
            );
            unmatched.push(column.clone());
        }
    }

    if strict && !unmatched.is_empty() {
        return Err(GlycoError::UnmappedPatients { ids: unmatched });
    }

    let (mutated, wildtype): (Vec<String>, Vec<String>) = sample_ids
        .iter()
        .cloned()
        .partition(|id| mapped_set.contains(id.as_str()));

    if mutated.is_empty() {
        return Err(GlycoError::EmptyData {
            reason: "No mutated patients matched an abundance column".to_string(),
        });
    }
    if wildtype.is_empty() {
        return Err(GlycoError::EmptyData {
            reason: "Every patient is in the mutated cohort; no wild-type samples".to_string(),
        });
    }

    info!(
        "Cohorts: {} mutated, {} wild-type ({} unmatched)",
        mutated.len(),
        wildtype.len(),
        unmatched.len()
    );

    Ok(CohortAssignment {
        mutated,
        wildtype,
        unmatched,
    })
}
