//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent business rule violations.
/// These are the blocking, user-facing errors of the plan builder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Please select a medication first.")]
    NoSelection,

    #[error("Please add at least directions, instructions, or notes before adding the medication.")]
    EmptyEntry,

    #[error("no medication matches: {0}")]
    MedicationNotFound(String),
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
