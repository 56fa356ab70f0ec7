//! Document record and identifier.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Opaque unique identifier of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generate a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error returned when a string is not a valid document identifier.
#[derive(Debug, Error)]
#[error("invalid document id '{input}'")]
pub struct ParseDocumentIdError {
    input: String,
    #[source]
    source: uuid::Error,
}

impl FromStr for DocumentId {
    type Err = ParseDocumentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|source| ParseDocumentIdError {
                input: s.to_string(),
                source,
            })
    }
}

/// A note document as held by the document store.
///
/// `content` is the serialized rich-text payload produced by the editor; this
/// crate never looks inside it. Field names serialize in camelCase to match
/// the remote record shape (`coverImage`, `isPublished`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Document identifier.
    #[serde(default)]
    pub id: DocumentId,
    /// Title shown in the toolbar.
    #[serde(default)]
    pub title: String,
    /// Serialized editor content, absent for a brand-new document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// URL of the cover image in file storage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Emoji icon.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub is_archived: bool,
    #[serde(default)]
    pub is_published: bool,
}

impl Document {
    /// Create an empty document with a fresh identifier.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            title: title.into(),
            content: None,
            cover_image: None,
            icon: None,
            is_archived: false,
            is_published: false,
        }
    }

    /// Builder: set the initial content.
    #[must_use]
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Builder: set the cover image URL.
    #[must_use]
    pub fn with_cover_image(mut self, url: impl Into<String>) -> Self {
        self.cover_image = Some(url.into());
        self
    }

    /// Whether a cover image is attached.
    pub fn has_cover(&self) -> bool {
        self.cover_image.is_some()
    }
}
