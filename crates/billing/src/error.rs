//! Billing error model.

use thiserror::Error;

use facturation_core::DomainError;

/// Failure reported by a storage collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// The backing store could not be reached or read.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The store refused a write (constraint, validation...).
    #[error("storage rejected the operation: {0}")]
    Rejected(String),

    #[error("record not found")]
    NotFound,
}

impl From<DomainError> for StorageError {
    fn from(value: DomainError) -> Self {
        match value {
            DomainError::NotFound => StorageError::NotFound,
            other => StorageError::Rejected(other.to_string()),
        }
    }
}

/// Errors that abort a whole billing run.
///
/// Per-client write failures during a commit are not errors at this level; they are
/// reported in the run result.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BillingError {
    #[error("invalid billing period: month {month}, year {year}")]
    InvalidPeriod { month: u32, year: i32 },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("a commit is already running for {month:02}/{year}")]
    CommitInProgress { month: u32, year: i32 },

    /// A price or total does not fit in cents.
    #[error("billing amount out of range: {0}")]
    AmountOutOfRange(#[from] DomainError),
}

pub type BillingResult<T> = Result<T, BillingError>;
