//! Data structures for the glycopeptide analysis

mod abundance;
mod clinical;
mod mutation;

pub use abundance::{AbundanceMatrix, PeptideSymbols};
pub use clinical::{ClinicalRecord, ClinicalTable};
pub use mutation::{MutationRecord, MutationTable, PatientId};
