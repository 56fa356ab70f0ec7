//! Document model types for Quill.
//!
//! This crate holds the plain data shared by the store, the autosave engine
//! and the command line:
//!
//! - [`document`]: the document record and its identifier
//! - [`query`]: the three outcomes of a reactive document read
//! - [`view`]: what a document page shows for each query outcome
//!
//! # Example
//!
//! ```
//! use quill_model::{Document, PageMode, PageView, QueryState};
//!
//! let doc = Document::new("Meeting notes");
//! let view = PageView::from_query(&QueryState::Ready(doc), PageMode::Preview);
//!
//! assert!(matches!(view, PageView::Document(_)));
//! ```

pub mod document;
pub mod query;
pub mod view;

pub use document::{Document, DocumentId, ParseDocumentIdError};
pub use query::QueryState;
pub use view::{
    CoverHeight, CoverView, DocumentView, PageMode, PageView, SKELETON_LINE_WIDTHS,
    SkeletonLayout,
};
