//! Trailing-edge debounce of editor changes into document updates.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use quill_model::DocumentId;
use quill_store::{DocumentStore, StoreError};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::config::{AutoSaveConfig, FailurePolicy};
use super::tracker::DirtyTracker;
use crate::error::{PersistenceError, Result};

/// Counters describing what an [`AutoSaver`] has done so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutoSaveStats {
    /// Timers armed.
    pub scheduled: u64,
    /// Pending saves discarded before they fired.
    pub cancelled: u64,
    /// Changes ignored because the content was already saved or pending.
    pub duplicates: u64,
    /// Update calls issued.
    pub dispatched: u64,
    pub succeeded: u64,
    pub failed: u64,
}

/// Content waiting for its quiet period to elapse.
#[derive(Debug)]
struct PendingSave {
    generation: u64,
    content: String,
    /// `None` when auto-save is disabled and only a flush will write it.
    timer: Option<JoinHandle<()>>,
}

impl PendingSave {
    fn cancel(self) -> String {
        if let Some(timer) = self.timer {
            timer.abort();
        }
        self.content
    }
}

#[derive(Debug, Default)]
struct SaveState {
    tracker: DirtyTracker,
    /// Content of the most recently issued update, recorded when issued.
    last_dispatched: Option<String>,
    pending: Option<PendingSave>,
    /// Bumped for every accepted change; a timer only fires if its
    /// generation is still the pending one.
    generation: u64,
    stats: AutoSaveStats,
}

struct Inner {
    document_id: DocumentId,
    store: Arc<dyn DocumentStore>,
    config: AutoSaveConfig,
    state: Mutex<SaveState>,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, SaveState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Arm a timer for `generation`. Caller holds the state lock.
    fn arm(self: &Arc<Self>, state: &mut SaveState, generation: u64, delay: Duration) -> JoinHandle<()> {
        state.stats.scheduled += 1;
        trace!(document = %self.document_id, generation, delay_ms = delay.as_millis() as u64, "autosave timer armed");
        spawn_timer(Arc::clone(self), generation, delay)
    }

    /// Claim the pending content if `generation` is still current.
    fn take_due(&self, generation: u64) -> Option<String> {
        let mut state = self.lock();
        if state.pending.as_ref().map(|p| p.generation) != Some(generation) {
            return None;
        }
        let pending = state.pending.take()?;
        Some(Self::begin_dispatch(&mut state, pending.content))
    }

    fn begin_dispatch(state: &mut SaveState, content: String) -> String {
        state.last_dispatched = Some(content.clone());
        state.tracker.start_save();
        state.stats.dispatched += 1;
        content
    }

    /// Issue the update and settle the bookkeeping once it resolves.
    async fn dispatch(
        self: &Arc<Self>,
        generation: u64,
        content: String,
    ) -> std::result::Result<(), StoreError> {
        let result = self.store.update(self.document_id, content.clone()).await;

        let mut state = self.lock();
        let superseded = state.generation != generation;
        match result {
            Ok(()) => {
                state.tracker.save_complete(superseded);
                state.stats.succeeded += 1;
                debug!(document = %self.document_id, bytes = content.len(), superseded, "autosave complete");
                Ok(())
            }
            Err(error) => {
                state.tracker.save_failed();
                state.stats.failed += 1;
                warn!(document = %self.document_id, %error, "autosave failed");
                if self.config.on_failure == FailurePolicy::Rearm && error.is_transient() {
                    self.rearm_after_failure(&mut state, superseded, content);
                }
                Err(error)
            }
        }
    }

    fn rearm_after_failure(self: &Arc<Self>, state: &mut SaveState, superseded: bool, content: String) {
        if state.last_dispatched.as_deref() == Some(content.as_str()) {
            state.last_dispatched = None;
        }
        if superseded || state.pending.is_some() || !self.config.enabled {
            return;
        }
        state.generation += 1;
        let generation = state.generation;
        let timer = self.arm(state, generation, self.config.quiet_period());
        state.pending = Some(PendingSave {
            generation,
            content,
            timer: Some(timer),
        });
        debug!(document = %self.document_id, "failed autosave re-armed");
    }
}

fn spawn_timer(inner: Arc<Inner>, generation: u64, delay: Duration) -> JoinHandle<()> {
    let task: Pin<Box<dyn Future<Output = ()> + Send>> = Box::pin(async move {
        tokio::time::sleep(delay).await;
        if let Some(content) = inner.take_due(generation) {
            // Failures are logged and counted in `dispatch`.
            let _ = inner.dispatch(generation, content).await;
        }
    });
    tokio::spawn(task)
}

/// Debounced autosave for one document editing session.
///
/// Every editor change goes through [`AutoSaver::on_change`]. A change
/// identical to the content last sent to the store (or already waiting) is
/// ignored. Any other change discards the waiting content and arms a new
/// timer; when the timer survives a full quiet period, the content is
/// recorded as dispatched and the store update is issued.
///
/// The dispatched guard is recorded before the update resolves. Under
/// [`FailurePolicy::Forget`] a rejected save is therefore not retried until
/// the content changes again.
///
/// Timers run as tokio tasks, so `on_change` must be called from within a
/// runtime. Dropping the saver does not cancel an armed timer; use
/// [`AutoSaver::flush`] or [`AutoSaver::cancel`] when the session ends.
pub struct AutoSaver {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AutoSaver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoSaver")
            .field("document_id", &self.inner.document_id)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl AutoSaver {
    pub fn new(
        document_id: DocumentId,
        store: Arc<dyn DocumentStore>,
        config: AutoSaveConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                document_id,
                store,
                config,
                state: Mutex::new(SaveState::default()),
            }),
        }
    }

    pub fn document_id(&self) -> DocumentId {
        self.inner.document_id
    }

    pub fn config(&self) -> &AutoSaveConfig {
        &self.inner.config
    }

    /// Handle a content change from the editor.
    pub fn on_change(&self, content: impl Into<String>) {
        let content = content.into();
        let inner = &self.inner;
        let mut state = inner.lock();

        let matches_pending = state.pending.as_ref().is_some_and(|p| p.content == content);
        let matches_dispatched = state.last_dispatched.as_deref() == Some(content.as_str());

        // Already waiting or already dispatched: no-op, a waiting save stays armed.
        if matches_pending || matches_dispatched {
            state.stats.duplicates += 1;
            trace!(document = %inner.document_id, "unchanged content ignored");
            return;
        }

        if let Some(previous) = state.pending.take() {
            previous.cancel();
            state.stats.cancelled += 1;
        }

        state.tracker.mark_dirty();
        state.generation += 1;
        let generation = state.generation;

        let timer = if inner.config.enabled {
            let since_first = state.tracker.since_first_unsaved().unwrap_or_default();
            let delay = inner.config.next_delay(since_first);
            Some(inner.arm(&mut state, generation, delay))
        } else {
            None
        };

        state.pending = Some(PendingSave {
            generation,
            content,
            timer,
        });
    }

    /// Save waiting content now instead of at the end of its quiet period.
    ///
    /// Returns `Ok(false)` when nothing was waiting.
    pub async fn flush(&self) -> Result<bool> {
        let due = {
            let mut state = self.inner.lock();
            match state.pending.take() {
                Some(pending) => {
                    let generation = pending.generation;
                    let content = Inner::begin_dispatch(&mut state, pending.cancel());
                    Some((generation, content))
                }
                None => None,
            }
        };

        let Some((generation, content)) = due else {
            return Ok(false);
        };
        self.inner
            .dispatch(generation, content)
            .await
            .map_err(|source| PersistenceError::Save {
                id: self.inner.document_id,
                source,
            })?;
        Ok(true)
    }

    /// Discard waiting content without saving it.
    pub fn cancel(&self) -> Option<String> {
        let mut state = self.inner.lock();
        let pending = state.pending.take()?;
        state.stats.cancelled += 1;
        state.tracker.discard();
        Some(pending.cancel())
    }

    /// Whether there are edits not yet confirmed by the store.
    pub fn is_dirty(&self) -> bool {
        self.inner.lock().tracker.is_dirty()
    }

    /// Whether content is waiting for its quiet period.
    pub fn has_pending(&self) -> bool {
        self.inner.lock().pending.is_some()
    }

    /// Whether an update call is in flight.
    pub fn is_saving(&self) -> bool {
        self.inner.lock().tracker.is_saving()
    }

    /// Content of the most recently issued update.
    pub fn last_dispatched(&self) -> Option<String> {
        self.inner.lock().last_dispatched.clone()
    }

    pub fn stats(&self) -> AutoSaveStats {
        self.inner.lock().stats
    }
}
