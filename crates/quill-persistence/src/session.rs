//! One open document page.

use std::sync::Arc;

use quill_model::{Document, DocumentId, PageMode, PageView, QueryState};
use quill_store::{DocumentStore, FileStorage};
use tokio::sync::watch;
use tracing::debug;

use crate::autosave::{AutoSaveConfig, AutoSaver};
use crate::cover::{CoverController, CoverImageModal};
use crate::error::{PersistenceError, Result};

/// Editing session for a single document page.
///
/// Owns the document subscription, the autosave debouncer and the cover
/// controls for as long as the page is open. The debouncer lives here rather
/// than in any view, so re-rendering never resets its timer or guard.
pub struct EditingSession {
    document_id: DocumentId,
    mode: PageMode,
    query: watch::Receiver<QueryState<Document>>,
    autosaver: AutoSaver,
    cover: CoverController,
    cover_modal: CoverImageModal,
}

impl EditingSession {
    pub fn open(
        document_id: DocumentId,
        documents: Arc<dyn DocumentStore>,
        files: Arc<dyn FileStorage>,
        config: AutoSaveConfig,
        mode: PageMode,
    ) -> Self {
        let query = documents.subscribe(document_id);
        debug!(document = %document_id, ?mode, "editing session opened");
        Self {
            document_id,
            mode,
            query,
            autosaver: AutoSaver::new(document_id, Arc::clone(&documents), config),
            cover: CoverController::new(document_id, documents, files),
            cover_modal: CoverImageModal::new(),
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.document_id
    }

    pub fn mode(&self) -> PageMode {
        self.mode
    }

    /// What the page currently shows.
    pub fn view(&self) -> PageView {
        PageView::from_query(&self.query.borrow(), self.mode)
    }

    /// Wait for the document to change and return the new view.
    ///
    /// Returns `None` once the store has shut down.
    pub async fn changed(&mut self) -> Option<PageView> {
        self.query.changed().await.ok()?;
        Some(self.view())
    }

    /// Forward an editor change to the autosave debouncer.
    pub fn on_change(&self, content: impl Into<String>) {
        self.autosaver.on_change(content);
    }

    pub fn autosaver(&self) -> &AutoSaver {
        &self.autosaver
    }

    pub fn cover_modal(&self) -> &CoverImageModal {
        &self.cover_modal
    }

    pub fn cover_modal_mut(&mut self) -> &mut CoverImageModal {
        &mut self.cover_modal
    }

    fn cover_url(&self) -> Option<String> {
        self.query.borrow().ready().and_then(|doc| doc.cover_image.clone())
    }

    /// Open the cover picker to replace the current cover.
    ///
    /// Returns false when there is no cover or the page is a preview.
    pub fn change_cover(&mut self) -> bool {
        if self.mode.is_preview() {
            return false;
        }
        match self.cover_url() {
            Some(url) => {
                self.cover_modal.on_replace(url);
                true
            }
            None => false,
        }
    }

    /// Remove the current cover image.
    pub async fn remove_cover(&self) -> Result<()> {
        if self.mode.is_preview() {
            return Err(PersistenceError::ReadOnly {
                id: self.document_id,
            });
        }
        let url = self.cover_url();
        self.cover.remove(url.as_deref()).await
    }

    /// Close the page, saving any waiting content first.
    pub async fn close(self) -> Result<bool> {
        let flushed = self.autosaver.flush().await?;
        debug!(document = %self.document_id, flushed, "editing session closed");
        Ok(flushed)
    }
}
