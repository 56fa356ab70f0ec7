//! Cover image removal and the cover picker state.

use std::sync::Arc;

use quill_model::DocumentId;
use quill_store::{DocumentStore, FileStorage, StoreError};
use tracing::{info, warn};

use crate::error::{PersistenceError, Result};

/// Removes a document's cover image.
///
/// Removal is two remote calls with no transaction between them: the stored
/// object is deleted first, then the document's cover association is
/// cleared. If the process stops in between, the document keeps a URL that
/// no longer resolves.
pub struct CoverController {
    document_id: DocumentId,
    documents: Arc<dyn DocumentStore>,
    files: Arc<dyn FileStorage>,
}

impl CoverController {
    pub fn new(
        document_id: DocumentId,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
    ) -> Self {
        Self {
            document_id,
            documents,
            files,
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Delete the cover at `url` (if any) and clear the association.
    ///
    /// The delete is awaited before the association is cleared, and the
    /// association is cleared even when there is no URL. A failed delete
    /// stops the removal and the mutation is not issued. The one exception is
    /// [`StoreError::ObjectNotFound`]: the object is already gone, so the
    /// association is still cleared, which drops a dangling URL instead of
    /// keeping it.
    pub async fn remove(&self, url: Option<&str>) -> Result<()> {
        if let Some(url) = url {
            match self.files.delete(url).await {
                Ok(()) => {}
                Err(StoreError::ObjectNotFound { .. }) => {
                    warn!(document = %self.document_id, url, "cover object already deleted");
                }
                Err(source) => {
                    warn!(document = %self.document_id, url, error = %source, "cover delete failed");
                    return Err(PersistenceError::DeleteCover {
                        url: url.to_string(),
                        source,
                    });
                }
            }
        }

        self.documents
            .remove_cover_image(self.document_id)
            .await
            .map_err(|source| PersistenceError::RemoveCover {
                id: self.document_id,
                source,
            })?;
        info!(document = %self.document_id, had_url = url.is_some(), "cover image removed");
        Ok(())
    }
}

/// Open/close state of the cover image picker.
///
/// Opening it through [`CoverImageModal::on_replace`] remembers the URL being
/// replaced so the uploader can overwrite that object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoverImageModal {
    open: bool,
    replace_target: Option<String>,
}

impl CoverImageModal {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// URL of the cover being replaced, if the picker was opened to replace one.
    pub fn replace_target(&self) -> Option<&str> {
        self.replace_target.as_deref()
    }

    /// Open the picker to add a new cover.
    pub fn on_open(&mut self) {
        self.open = true;
        self.replace_target = None;
    }

    /// Open the picker to replace the cover at `url`.
    pub fn on_replace(&mut self, url: impl Into<String>) {
        self.open = true;
        self.replace_target = Some(url.into());
    }

    pub fn on_close(&mut self) {
        self.open = false;
        self.replace_target = None;
    }
}
