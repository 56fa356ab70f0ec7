//! Ordered log of collaborator calls.

use std::sync::{Arc, Mutex, PoisonError};

use quill_model::DocumentId;
use tokio::time::Instant;

/// A call issued against one of the collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreCall {
    Update { id: DocumentId, content: String },
    RemoveCoverImage { id: DocumentId },
    DeleteFile { url: String },
}

impl StoreCall {
    /// Operation name for summaries.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Update { .. } => "update",
            Self::RemoveCoverImage { .. } => "removeCoverImage",
            Self::DeleteFile { .. } => "delete",
        }
    }
}

/// Shared, append-only record of calls in the order they were issued.
///
/// Clones share the same log, so one log can be handed to both the document
/// store and the file storage to observe cross-service ordering.
#[derive(Debug, Clone)]
pub struct CallLog {
    origin: Instant,
    entries: Arc<Mutex<Vec<(Instant, StoreCall)>>>,
}

impl Default for CallLog {
    fn default() -> Self {
        Self::new()
    }
}

impl CallLog {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn record(&self, call: StoreCall) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((Instant::now(), call));
    }

    /// Calls in issue order.
    pub fn calls(&self) -> Vec<StoreCall> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// Calls with their offset from log creation, in milliseconds.
    pub fn timed_calls(&self) -> Vec<(u64, StoreCall)> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(at, call)| {
                let offset = at.duration_since(self.origin).as_millis() as u64;
                (offset, call.clone())
            })
            .collect()
    }

    /// Number of recorded `update` calls.
    pub fn update_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, StoreCall::Update { .. }))
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
