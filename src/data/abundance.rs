//! Glycopeptide abundance matrix

use std::collections::HashSet;

use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

use crate::error::{GlycoError, Result};

/// Return the first duplicated name, if any
fn first_duplicate(names: &[String]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(names.len());
    names.iter().find(|n| !seen.insert(n.as_str())).map(|s| s.as_str())
}

/// Log-ratio abundance values for N-glycopeptides across patient samples
/// Rows are peptides, columns are patient samples; missing values are NaN
#[derive(Debug, Clone)]
pub struct AbundanceMatrix {
    /// Abundance data (peptides x samples)
    values: Array2<f64>,
    /// Peptide identifiers (row keys)
    peptide_ids: Vec<String>,
    /// Patient sample identifiers (column keys)
    sample_ids: Vec<String>,
}

impl AbundanceMatrix {
    /// Create a new abundance matrix from raw data
    pub fn new(
        values: Array2<f64>,
        peptide_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (n_peptides, n_samples) = values.dim();

        if peptide_ids.len() != n_peptides {
            return Err(GlycoError::DimensionMismatch {
                expected: format!("{} peptide IDs", n_peptides),
                got: format!("{} peptide IDs", peptide_ids.len()),
            });
        }

        if sample_ids.len() != n_samples {
            return Err(GlycoError::DimensionMismatch {
                expected: format!("{} sample IDs", n_samples),
                got: format!("{} sample IDs", sample_ids.len()),
            });
        }

        if values.iter().any(|x| x.is_infinite()) {
            return Err(GlycoError::InvalidAbundanceTable {
                reason: "Abundance values must be finite or missing".to_string(),
            });
        }

        if let Some(dup) = first_duplicate(&peptide_ids) {
            return Err(GlycoError::InvalidAbundanceTable {
                reason: format!("Duplicate peptide ID '{}'", dup),
            });
        }

        if let Some(dup) = first_duplicate(&sample_ids) {
            return Err(GlycoError::InvalidAbundanceTable {
                reason: format!("Duplicate sample column '{}'", dup),
            });
        }

        Ok(Self {
            values,
            peptide_ids,
            sample_ids,
        })
    }

    /// Get the number of peptides
    pub fn n_peptides(&self) -> usize {
        self.values.nrows()
    }

    /// Get the number of samples
    pub fn n_samples(&self) -> usize {
        self.values.ncols()
    }

    /// Get the abundance values as a view
    pub fn values(&self) -> ArrayView2<'_, f64> {
        self.values.view()
    }

    /// Get peptide IDs
    pub fn peptide_ids(&self) -> &[String] {
        &self.peptide_ids
    }

    /// Get sample IDs
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Get values for a specific peptide
    pub fn peptide_values(&self, peptide_idx: usize) -> ArrayView1<'_, f64> {
        self.values.row(peptide_idx)
    }

    /// Get sample index by ID
    pub fn sample_index(&self, sample_id: &str) -> Option<usize> {
        self.sample_ids.iter().position(|id| id == sample_id)
    }

    /// Number of non-missing values per peptide
    pub fn present_counts(&self) -> Vec<usize> {
        self.values
            .axis_iter(Axis(0))
            .map(|row| row.iter().filter(|v| !v.is_nan()).count())
            .collect()
    }

    /// Replace the values, keeping row and column keys
    pub fn with_values(&self, values: Array2<f64>) -> Result<Self> {
        Self::new(values, self.peptide_ids.clone(), self.sample_ids.clone())
    }

    /// Subset to specific peptides (in the given order)
    pub fn subset_peptides(&self, peptide_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(0), peptide_indices);
        let new_peptide_ids: Vec<String> = peptide_indices
            .iter()
            .map(|&i| self.peptide_ids[i].clone())
            .collect();

        Self::new(new_values, new_peptide_ids, self.sample_ids.clone())
    }

    /// Subset to specific samples (in the given order)
    pub fn subset_samples(&self, sample_indices: &[usize]) -> Result<Self> {
        let new_values = self.values.select(Axis(1), sample_indices);
        let new_sample_ids: Vec<String> = sample_indices
            .iter()
            .map(|&i| self.sample_ids[i].clone())
            .collect();

        Self::new(new_values, self.peptide_ids.clone(), new_sample_ids)
    }

    /// Subset to samples by ID, failing on an unknown ID
    pub fn select_samples(&self, sample_ids: &[String]) -> Result<Self> {
        let indices = sample_ids
            .iter()
            .map(|id| {
                self.sample_index(id).ok_or_else(|| GlycoError::InvalidInput {
                    reason: format!("Sample '{}' not found in abundance matrix", id),
                })
            })
            .collect::<Result<Vec<usize>>>()?;
        self.subset_samples(&indices)
    }
}

/// Peptide to gene symbol mapping, in input table order
///
/// Peptides without a symbol keep their entry so the gene list still carries
/// a line for them.
#[derive(Debug, Clone, Default)]
pub struct PeptideSymbols {
    entries: Vec<(String, Option<String>)>,
}

impl PeptideSymbols {
    pub fn new(entries: Vec<(String, Option<String>)>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[(String, Option<String>)] {
        &self.entries
    }

    /// Symbol for a peptide (first match)
    pub fn symbol(&self, peptide_id: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == peptide_id)
            .and_then(|(_, s)| s.as_deref())
    }

    /// Inner join against a set of peptides, keeping this table's order.
    /// A missing symbol comes back as an empty string.
    pub fn symbols_for(&self, peptides: &HashSet<&str>) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(p, _)| peptides.contains(p.as_str()))
            .map(|(_, s)| s.clone().unwrap_or_default())
            .collect()
    }
}
