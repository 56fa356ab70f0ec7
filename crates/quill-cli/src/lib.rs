//! CLI library components for Quill.

pub mod logging;
pub mod replay;
pub mod settings;
