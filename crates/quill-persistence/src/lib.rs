//! Document persistence for the Quill editor.
//!
//! This crate turns editor activity into calls against the external document
//! store and file storage.
//!
//! # Features
//!
//! - **Debounced auto-save**: bursts of edits become one trailing update
//! - **Duplicate suppression**: unchanged content is never re-sent
//! - **Cover removal**: stored object deletion followed by record update
//! - **Editing sessions**: page view, autosave and cover controls in one place
//!
//! # Example
//!
//! ```ignore
//! use quill_persistence::{AutoSaveConfig, AutoSaver};
//!
//! let saver = AutoSaver::new(document_id, store, AutoSaveConfig::default());
//! saver.on_change("first draft");
//! saver.on_change("first draft, revised");
//! // ~800 ms later a single update carrying the revised text is issued
//! ```
//!
//! # Architecture
//!
//! - `autosave/` - Auto-save infrastructure (AutoSaver, DirtyTracker, config)
//! - `cover.rs` - Cover removal and cover picker state
//! - `session.rs` - Editing session tying the pieces to one document
//! - `error.rs` - Error types with user-friendly messages

mod autosave;
mod cover;
mod error;
mod session;

pub use autosave::{
    AutoSaveConfig, AutoSaveStats, AutoSaver, DEFAULT_QUIET_PERIOD_MS, DirtyTracker, FailurePolicy,
};
pub use cover::{CoverController, CoverImageModal};
pub use error::{PersistenceError, Result};
pub use session::EditingSession;
