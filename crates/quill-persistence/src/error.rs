//! Persistence error types.
//!
//! Every failed remote call is wrapped with the phase it failed in, and
//! errors provide user-friendly messages and optional remediation hints.

use quill_model::DocumentId;
use quill_store::StoreError;
use thiserror::Error;

/// Persistence operation error.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// The document store rejected a content update.
    #[error("Failed to save document {id}")]
    Save {
        id: DocumentId,
        #[source]
        source: StoreError,
    },

    /// File storage could not delete the cover image.
    #[error("Failed to delete cover image: {url}")]
    DeleteCover {
        url: String,
        #[source]
        source: StoreError,
    },

    /// The document store could not clear the cover association.
    #[error("Failed to remove cover image from document {id}")]
    RemoveCover {
        id: DocumentId,
        #[source]
        source: StoreError,
    },

    /// A mutation was requested from a read-only preview page.
    #[error("Document {id} is open in preview mode")]
    ReadOnly { id: DocumentId },
}

impl PersistenceError {
    /// The underlying store error, if any.
    pub fn store_error(&self) -> Option<&StoreError> {
        match self {
            Self::Save { source, .. }
            | Self::DeleteCover { source, .. }
            | Self::RemoveCover { source, .. } => Some(source),
            Self::ReadOnly { .. } => None,
        }
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Save { .. } => "Your latest changes could not be saved.".to_string(),
            Self::DeleteCover { .. } => "The cover image could not be deleted.".to_string(),
            Self::RemoveCover { .. } => {
                "The cover image could not be removed from this page.".to_string()
            }
            Self::ReadOnly { .. } => "This page is read-only.".to_string(),
        }
    }

    /// Get a suggestion for how to resolve this error.
    pub fn suggestion(&self) -> Option<String> {
        match self.store_error() {
            Some(StoreError::Unavailable { .. }) => {
                Some("Check your connection and try again.".into())
            }
            Some(StoreError::DocumentNotFound { .. }) => {
                Some("The page may have been deleted. Reload to see its current state.".into())
            }
            Some(_) => None,
            None => Some("Open the page from your workspace to edit it.".into()),
        }
    }
}

/// Result type alias for persistence operations.
pub type Result<T> = std::result::Result<T, PersistenceError>;
