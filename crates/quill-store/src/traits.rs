//! Collaborator traits.

use async_trait::async_trait;
use quill_model::{Document, DocumentId, QueryState};
use tokio::sync::watch;

use crate::error::Result;

/// Structured record store holding documents.
///
/// The store is the sole source of truth for documents. Callers only ever
/// hold transient copies.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Subscribe to a document.
    ///
    /// The receiver starts at [`QueryState::Loading`] until the store has
    /// resolved the record, then re-emits whenever the record changes.
    fn subscribe(&self, id: DocumentId) -> watch::Receiver<QueryState<Document>>;

    /// One-shot read of a document.
    async fn get_by_id(&self, id: DocumentId) -> Result<Option<Document>>;

    /// Replace the content of a document.
    ///
    /// Idempotent: writing the same content twice leaves the same record.
    async fn update(&self, id: DocumentId, content: String) -> Result<()>;

    /// Clear the cover image association of a document.
    async fn remove_cover_image(&self, id: DocumentId) -> Result<()>;
}

/// Binary object storage addressed by URL.
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Delete the object stored at `url`.
    async fn delete(&self, url: &str) -> Result<()>;
}
