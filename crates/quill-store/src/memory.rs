//! In-memory collaborator implementations
//!
//! These back the tests and the replay tool. Both implementations record
//! every call they receive into a [`CallLog`] at issue time, before any
//! artificial latency and before injected failures are applied.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use quill_model::{Document, DocumentId, QueryState};
use tokio::sync::watch;
use tracing::{debug, trace};

use crate::call_log::{CallLog, StoreCall};
use crate::error::{Result, StoreError};
use crate::traits::{DocumentStore, FileStorage};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Default)]
struct DocumentTable {
    records: HashMap<DocumentId, Document>,
    channels: HashMap<DocumentId, watch::Sender<QueryState<Document>>>,
    /// While false every subscription reports `Loading`.
    resolved: bool,
    update_failures: VecDeque<StoreError>,
    remove_cover_failures: VecDeque<StoreError>,
}

impl DocumentTable {
    fn state_of(&self, id: DocumentId) -> QueryState<Document> {
        if !self.resolved {
            return QueryState::Loading;
        }
        QueryState::from_lookup(self.records.get(&id).cloned())
    }

    fn publish(&self, id: DocumentId) {
        if let Some(sender) = self.channels.get(&id) {
            sender.send_replace(self.state_of(id));
        }
    }
}

/// In-memory document store.
///
/// Holds one `watch` channel per subscribed document so subscribers observe
/// every change, including documents inserted after they subscribed.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    table: Mutex<DocumentTable>,
    latency: Option<Duration>,
    log: CallLog,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDocumentStore {
    /// Create an empty store whose reads resolve immediately.
    pub fn new() -> Self {
        Self {
            table: Mutex::new(DocumentTable {
                resolved: true,
                ..DocumentTable::default()
            }),
            latency: None,
            log: CallLog::new(),
        }
    }

    /// Create a store whose subscriptions stay `Loading` until [`Self::resolve`].
    pub fn unresolved() -> Self {
        let store = Self::new();
        lock(&store.table).resolved = false;
        store
    }

    /// Record calls into the given log instead of a private one.
    #[must_use]
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    /// Delay every mutation by `latency` after it is issued.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// The log this store records into.
    pub fn call_log(&self) -> &CallLog {
        &self.log
    }

    /// Insert or replace a document and notify its subscribers.
    pub fn insert(&self, document: Document) {
        let id = document.id;
        let mut table = lock(&self.table);
        table.records.insert(id, document);
        table.publish(id);
    }

    /// Delete a document and notify its subscribers.
    pub fn delete(&self, id: DocumentId) -> Option<Document> {
        let mut table = lock(&self.table);
        let removed = table.records.remove(&id);
        table.publish(id);
        removed
    }

    /// Current stored copy of a document.
    pub fn snapshot(&self, id: DocumentId) -> Option<Document> {
        lock(&self.table).records.get(&id).cloned()
    }

    /// Resolve all pending reads.
    pub fn resolve(&self) {
        let mut table = lock(&self.table);
        table.resolved = true;
        let ids: Vec<DocumentId> = table.channels.keys().copied().collect();
        for id in ids {
            table.publish(id);
        }
    }

    /// Make the next `update` call fail with `error`.
    pub fn fail_next_update(&self, error: StoreError) {
        lock(&self.table).update_failures.push_back(error);
    }

    /// Make the next `remove_cover_image` call fail with `error`.
    pub fn fail_next_remove_cover(&self, error: StoreError) {
        lock(&self.table).remove_cover_failures.push_back(error);
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn subscribe(&self, id: DocumentId) -> watch::Receiver<QueryState<Document>> {
        let mut table = lock(&self.table);
        if let Some(sender) = table.channels.get(&id) {
            return sender.subscribe();
        }
        let (sender, receiver) = watch::channel(table.state_of(id));
        table.channels.insert(id, sender);
        trace!(%id, "opened document subscription");
        receiver
    }

    async fn get_by_id(&self, id: DocumentId) -> Result<Option<Document>> {
        Ok(self.snapshot(id))
    }

    async fn update(&self, id: DocumentId, content: String) -> Result<()> {
        self.log.record(StoreCall::Update {
            id,
            content: content.clone(),
        });
        self.simulate_latency().await;

        let mut table = lock(&self.table);
        if let Some(error) = table.update_failures.pop_front() {
            return Err(error);
        }
        let record = table
            .records
            .get_mut(&id)
            .ok_or(StoreError::DocumentNotFound { id })?;
        record.content = Some(content);
        debug!(%id, "document content updated");
        table.publish(id);
        Ok(())
    }

    async fn remove_cover_image(&self, id: DocumentId) -> Result<()> {
        self.log.record(StoreCall::RemoveCoverImage { id });
        self.simulate_latency().await;

        let mut table = lock(&self.table);
        if let Some(error) = table.remove_cover_failures.pop_front() {
            return Err(error);
        }
        let record = table
            .records
            .get_mut(&id)
            .ok_or(StoreError::DocumentNotFound { id })?;
        record.cover_image = None;
        debug!(%id, "cover image association cleared");
        table.publish(id);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct ObjectTable {
    objects: HashSet<String>,
    delete_failures: VecDeque<StoreError>,
}

/// In-memory file storage keyed by URL.
#[derive(Debug, Default)]
pub struct InMemoryFileStorage {
    table: Mutex<ObjectTable>,
    log: CallLog,
}

impl InMemoryFileStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls into the given log instead of a private one.
    #[must_use]
    pub fn with_call_log(mut self, log: CallLog) -> Self {
        self.log = log;
        self
    }

    pub fn call_log(&self) -> &CallLog {
        &self.log
    }

    /// Store an object at `url`.
    pub fn put(&self, url: impl Into<String>) {
        lock(&self.table).objects.insert(url.into());
    }

    pub fn contains(&self, url: &str) -> bool {
        lock(&self.table).objects.contains(url)
    }

    pub fn object_count(&self) -> usize {
        lock(&self.table).objects.len()
    }

    /// Make the next `delete` call fail with `error`.
    pub fn fail_next_delete(&self, error: StoreError) {
        lock(&self.table).delete_failures.push_back(error);
    }
}

#[async_trait]
impl FileStorage for InMemoryFileStorage {
    async fn delete(&self, url: &str) -> Result<()> {
        self.log.record(StoreCall::DeleteFile {
            url: url.to_string(),
        });

        let mut table = lock(&self.table);
        if let Some(error) = table.delete_failures.pop_front() {
            return Err(error);
        }
        if !table.objects.remove(url) {
            return Err(StoreError::ObjectNotFound {
                url: url.to_string(),
            });
        }
        debug!(url, "stored object deleted");
        Ok(())
    }
}
