//! Errors returned by the service layer.

use thiserror::Error;

use gift0_core::ValidationError;

use crate::db::RepositoryError;
use crate::extraction::ExtractionError;

/// Errors from list, gift, identity, and intake operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input failed validation. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The acting user does not own the target, or the target does not exist.
    #[error("Unauthorized")]
    Unauthorized,

    /// No list has the given ID or share token.
    #[error("List not found")]
    ListNotFound,

    /// The gift is not on the list reached through the share token.
    #[error("Gift not found in this list")]
    GiftNotInList,

    /// A batch intake was called without URLs.
    #[error("No URLs provided")]
    EmptyBatch,

    /// The extraction adapter failed.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// Storage failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    /// Map a write on a row that vanished after its ownership check.
    ///
    /// Missing and foreign targets are the same error to the caller.
    pub(crate) fn unauthorized_if_gone(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::Unauthorized,
            other => Self::Repository(other),
        }
    }
}
