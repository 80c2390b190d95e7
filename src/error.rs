//! Error types for rust_glycodiff

use thiserror::Error;

/// Main error type for the glycopeptide analysis
#[derive(Error, Debug)]
pub enum GlycoError {
    #[error("Invalid abundance table: {reason}")]
    InvalidAbundanceTable { reason: String },

    #[error("Invalid mutation table: {reason}")]
    InvalidMutationTable { reason: String },

    #[error("Invalid clinical table: {reason}")]
    InvalidClinicalTable { reason: String },

    #[error("Invalid patient ID '{id}': {reason}")]
    InvalidPatientId { id: String, reason: String },

    #[error("Mutated patients without an abundance column: {ids:?}")]
    UnmappedPatients { ids: Vec<String> },

    #[error("Dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: String, got: String },

    #[error("Missing column '{column}' in {table}")]
    MissingColumn { column: String, table: String },

    #[error("Empty data: {reason}")]
    EmptyData { reason: String },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Spreadsheet error: {0}")]
    SpreadsheetError(#[from] calamine::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Result type alias for glycopeptide analysis operations
pub type Result<T> = std::result::Result<T, GlycoError>;
