//! Auto-save functionality for documents.
//!
//! Provides:
//! - `AutoSaver` - Debounces editor changes into document updates
//! - `DirtyTracker` - Tracks unsaved changes and saves in flight
//! - `AutoSaveConfig` - User settings for auto-save behavior

mod config;
mod debouncer;
mod tracker;

pub use config::{AutoSaveConfig, DEFAULT_QUIET_PERIOD_MS, FailurePolicy};
pub use debouncer::{AutoSaveStats, AutoSaver};
pub use tracker::DirtyTracker;
