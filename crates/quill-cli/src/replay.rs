//! Scripted editing session replay.
//!
//! A replay script seeds an in-memory document store with one document and
//! feeds timed editor events through an [`EditingSession`]. The report lists
//! every collaborator call the session issued, which makes debounce timing
//! and cover removal ordering visible without a real backend.
//!
//! ```json
//! {
//!   "document": { "title": "Notes", "coverImage": "https://files/c.png" },
//!   "events": [
//!     { "at_ms": 0,    "type": "edit", "content": "H" },
//!     { "at_ms": 120,  "type": "edit", "content": "Hi" },
//!     { "at_ms": 2000, "type": "remove_cover" }
//!   ]
//! }
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use quill_model::{Document, PageMode, PageView};
use quill_persistence::{AutoSaveConfig, AutoSaveStats, EditingSession};
use quill_store::{CallLog, DocumentStore, InMemoryDocumentStore, InMemoryFileStorage, StoreCall};
use serde::Deserialize;
use tokio::time::Instant;
use tracing::{info, warn};

/// A replay script.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayScript {
    pub document: Document,
    #[serde(default)]
    pub mode: PageMode,
    /// Objects present in file storage at start. The document's cover
    /// image is always added.
    #[serde(default)]
    pub files: Vec<String>,
    pub events: Vec<ReplayEvent>,
    /// Flush waiting content when the script ends.
    #[serde(default = "default_true")]
    pub close: bool,
}

fn default_true() -> bool {
    true
}

/// One timed editor event.
#[derive(Debug, Clone, Deserialize)]
pub struct ReplayEvent {
    /// Offset from the start of the replay.
    pub at_ms: u64,
    #[serde(flatten)]
    pub action: ReplayAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayAction {
    /// Editor content changed.
    Edit { content: String },
    /// "Remove" clicked on the cover.
    RemoveCover,
    /// "Change cover" clicked.
    ChangeCover,
    /// Save waiting content immediately.
    Flush,
}

/// Outcome of a replay.
#[derive(Debug, Clone)]
pub struct ReplayReport {
    /// Calls issued, with their offset in milliseconds.
    pub calls: Vec<(u64, StoreCall)>,
    /// Errors raised by events, with their offset in milliseconds.
    pub errors: Vec<(u64, String)>,
    pub stats: AutoSaveStats,
    pub final_view: PageView,
    pub final_document: Option<Document>,
}

impl ReplayReport {
    pub fn update_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|(_, call)| matches!(call, StoreCall::Update { .. }))
            .count()
    }
}

/// Read and parse a replay script.
pub fn load_script(path: &Path) -> Result<ReplayScript> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read script {}", path.display()))?;
    parse_script(&content).with_context(|| format!("invalid script {}", path.display()))
}

pub fn parse_script(json: &str) -> Result<ReplayScript> {
    let mut script: ReplayScript = serde_json::from_str(json)?;
    script.events.sort_by_key(|event| event.at_ms);
    Ok(script)
}

/// Run a script against fresh in-memory collaborators.
///
/// After the last event the replay waits one quiet period so a trailing
/// save lands naturally, then closes the session if the script asks for it.
pub async fn run_replay(script: ReplayScript, config: AutoSaveConfig) -> Result<ReplayReport> {
    let log = CallLog::new();
    let store = Arc::new(InMemoryDocumentStore::new().with_call_log(log.clone()));
    let files = Arc::new(InMemoryFileStorage::new().with_call_log(log.clone()));

    let document_id = script.document.id;
    for url in script.files.iter().chain(script.document.cover_image.iter()) {
        files.put(url.clone());
    }
    store.insert(script.document);

    let settle = config.quiet_period() + Duration::from_millis(50);
    let mut session = EditingSession::open(
        document_id,
        store.clone(),
        files.clone(),
        config,
        script.mode,
    );
    info!(document = %document_id, events = script.events.len(), "replay started");

    let start = Instant::now();
    let mut errors = Vec::new();
    for event in script.events {
        tokio::time::sleep_until(start + Duration::from_millis(event.at_ms)).await;
        let outcome = match event.action {
            ReplayAction::Edit { content } => {
                session.on_change(content);
                Ok(())
            }
            ReplayAction::RemoveCover => session.remove_cover().await,
            ReplayAction::ChangeCover => {
                if !session.change_cover() {
                    warn!(at_ms = event.at_ms, "no cover to change");
                }
                Ok(())
            }
            ReplayAction::Flush => session.autosaver().flush().await.map(|_| ()),
        };
        if let Err(error) = outcome {
            warn!(at_ms = event.at_ms, %error, "replay event failed");
            errors.push((event.at_ms, error.to_string()));
        }
    }

    tokio::time::sleep(settle).await;
    let stats = session.autosaver().stats();
    let final_view = session.view();
    if script.close {
        let closed_at = start.elapsed().as_millis() as u64;
        if let Err(error) = session.close().await {
            errors.push((closed_at, error.to_string()));
        }
    }

    let final_document = store
        .get_by_id(document_id)
        .await
        .context("failed to read final document")?;

    Ok(ReplayReport {
        calls: log.timed_calls(),
        errors,
        stats,
        final_view,
        final_document,
    })
}
