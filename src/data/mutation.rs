//! Somatic mutation records and patient ID conventions

use std::fmt;
use std::str::FromStr;

use crate::error::{GlycoError, Result};

/// A patient identifier as written in the mutation table, e.g. `123A`
///
/// The numeric part is the tumor sample number; the paired normal sample is
/// numbered one below it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PatientId {
    number: u32,
    suffix: char,
}

impl PatientId {
    /// Column name used by the abundance table: `N{number-1}{suffix}{number}`
    pub fn sample_column(&self) -> String {
        format!("N{}{}{}", self.number - 1, self.suffix, self.number)
    }
}

impl FromStr for PatientId {
    type Err = GlycoError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| GlycoError::InvalidPatientId {
            id: s.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = s.trim();
        let suffix = trimmed
            .chars()
            .last()
            .ok_or_else(|| invalid("empty identifier"))?;
        if !suffix.is_ascii_alphabetic() {
            return Err(invalid("expected a trailing letter"));
        }

        let digits = &trimmed[..trimmed.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid("expected digits before the trailing letter"));
        }

        let number: u32 = digits
            .parse()
            .map_err(|_| invalid("numeric part out of range"))?;
        if number == 0 {
            return Err(invalid("numeric part must be at least 1"));
        }

        Ok(Self { number, suffix })
    }
}

impl fmt::Display for PatientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.suffix)
    }
}

/// One somatic mutation record (patient, gene)
#[derive(Debug, Clone, PartialEq)]
pub struct MutationRecord {
    pub patient: String,
    pub gene: String,
}

/// Non-synonymous somatic mutation table
#[derive(Debug, Clone, Default)]
pub struct MutationTable {
    records: Vec<MutationRecord>,
}

impl MutationTable {
    pub fn new(records: Vec<MutationRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MutationRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct raw patient IDs carrying a mutation in `gene`, first-seen order
    pub fn patients_with(&self, gene: &str) -> Vec<&str> {
        let mut patients: Vec<&str> = Vec::new();
        for record in self.records.iter().filter(|r| r.gene == gene) {
            if !patients.contains(&record.patient.as_str()) {
                patients.push(record.patient.as_str());
            }
        }
        patients
    }

    /// Parsed patient IDs carrying a mutation in `gene`; a malformed ID is an error
    pub fn mutated_patients(&self, gene: &str) -> Result<Vec<PatientId>> {
        self.patients_with(gene)
            .into_iter()
            .map(PatientId::from_str)
            .collect()
    }
}
