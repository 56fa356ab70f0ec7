//! Collaborator interfaces for Quill.
//!
//! The document store and the file storage service are external to the
//! editor. This crate defines the contracts the editor consumes
//! ([`DocumentStore`], [`FileStorage`]) plus in-memory implementations used by
//! tests and the command line replay tool.
//!
//! # Architecture
//!
//! - `traits.rs` - async collaborator traits
//! - `memory.rs` - in-memory implementations with failure injection
//! - `call_log.rs` - ordered record of issued calls across collaborators
//! - `error.rs` - error types

mod call_log;
mod error;
mod memory;
mod traits;

pub use call_log::{CallLog, StoreCall};
pub use error::{Result, StoreError};
pub use memory::{InMemoryDocumentStore, InMemoryFileStorage};
pub use traits::{DocumentStore, FileStorage};
