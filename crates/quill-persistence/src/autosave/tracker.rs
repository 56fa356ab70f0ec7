//! Dirty state tracking for auto-save.

use std::time::Duration;

use tokio::time::Instant;

/// Tracks unsaved changes in an editing session.
///
/// Used to compute debounce deadlines and the "unsaved changes" indicator.
/// Times come from the tokio clock so a paused runtime controls them.
#[derive(Debug, Clone, Default)]
pub struct DirtyTracker {
    /// Whether there are unsaved changes.
    dirty: bool,

    /// When the first unsaved change was made.
    /// Reset when saved.
    first_unsaved_change: Option<Instant>,

    /// Number of saves issued but not yet settled.
    in_flight: usize,
}

impl DirtyTracker {
    /// Create a new tracker with no unsaved changes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if there are unsaved changes.
    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Check if at least one save is in progress.
    #[inline]
    pub fn is_saving(&self) -> bool {
        self.in_flight > 0
    }

    /// Number of saves in progress.
    #[inline]
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Mark the document as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;

        // Only set first_unsaved_change if this is the first change since the last dispatch
        if self.first_unsaved_change.is_none() {
            self.first_unsaved_change = Some(Instant::now());
        }
    }

    /// Mark that a save has started.
    ///
    /// Everything changed so far is now on its way to the store, so the
    /// max-wait window restarts with the next change, whatever the outcome.
    pub fn start_save(&mut self) {
        self.in_flight += 1;
        self.first_unsaved_change = None;
    }

    /// Mark that a save has completed successfully.
    ///
    /// `superseded` is true when a newer change arrived after the save was
    /// issued; the document then stays dirty.
    pub fn save_complete(&mut self, superseded: bool) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if !superseded {
            self.dirty = false;
            self.first_unsaved_change = None;
        }
    }

    /// Mark that a save has failed.
    pub fn save_failed(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
        // Keep dirty = true since save failed
    }

    /// Forget unsaved changes without saving them.
    pub fn discard(&mut self) {
        self.dirty = false;
        self.first_unsaved_change = None;
    }

    /// Time since the first unsaved change.
    pub fn since_first_unsaved(&self) -> Option<Duration> {
        self.first_unsaved_change.map(|t| t.elapsed())
    }
}
