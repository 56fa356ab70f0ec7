//! Store error types.

use quill_model::DocumentId;
use thiserror::Error;

/// Error returned by a document store or file storage call.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The addressed document does not exist.
    #[error("Document not found: {id}")]
    DocumentNotFound { id: DocumentId },

    /// The addressed stored object does not exist.
    #[error("Stored object not found: {url}")]
    ObjectNotFound { url: String },

    /// The service refused the operation.
    #[error("{operation} rejected: {reason}")]
    Rejected {
        operation: &'static str,
        reason: String,
    },

    /// The service could not be reached.
    #[error("Service unavailable: {reason}")]
    Unavailable { reason: String },
}

impl StoreError {
    /// Whether repeating the same call later may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable { .. })
    }
}

/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
