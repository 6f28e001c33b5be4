use thiserror::Error;
use validator::ValidationErrors;

use crate::{dao::storage::StorageError, state::result::ResultError};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Entity store failure, propagated unchanged.
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Invalid input provided by the caller.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Operation cannot be performed in the current state.
    #[error("invalid state: {0}")]
    InvalidState(String),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Result lifecycle rejected the change.
    #[error(transparent)]
    Result(#[from] ResultError),
}

impl From<ValidationErrors> for ServiceError {
    fn from(err: ValidationErrors) -> Self {
        ServiceError::InvalidInput(format!("validation failed: {err}"))
    }
}

impl From<time::error::ComponentRange> for ServiceError {
    fn from(err: time::error::ComponentRange) -> Self {
        ServiceError::InvalidState(format!("pick window misconfigured: {err}"))
    }
}
