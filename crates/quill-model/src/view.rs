//! Page view models.
//!
//! A document page renders one of three things depending on the query state:
//! skeleton placeholders while loading, a terminal "not found" notice, or the
//! cover plus editor for a ready document. These types describe that choice
//! without committing to any particular UI toolkit.

use serde::{Deserialize, Serialize};

use crate::document::{Document, DocumentId};
use crate::query::QueryState;

/// Widths (percent of the column) of the placeholder lines shown while loading.
pub const SKELETON_LINE_WIDTHS: [u8; 4] = [50, 80, 40, 60];

/// How the page is being viewed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageMode {
    /// Owner view with editing enabled.
    #[default]
    Edit,
    /// Public read-only preview.
    Preview,
}

impl PageMode {
    #[inline]
    pub fn is_preview(self) -> bool {
        self == Self::Preview
    }
}

/// Height of the cover band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverHeight {
    /// No cover image: a thin spacer band.
    Compact,
    /// Cover image present.
    Tall,
}

impl CoverHeight {
    /// Height as a percentage of the viewport height.
    pub fn viewport_percent(self) -> u8 {
        match self {
            Self::Compact => 12,
            Self::Tall => 35,
        }
    }
}

/// Cover band of a document page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverView {
    pub url: Option<String>,
    pub height: CoverHeight,
    /// Whether "Change cover" and "Remove" are offered.
    pub show_controls: bool,
}

impl CoverView {
    pub fn new(url: Option<&str>, mode: PageMode) -> Self {
        let url = url.map(str::to_string);
        let height = if url.is_some() {
            CoverHeight::Tall
        } else {
            CoverHeight::Compact
        };
        Self {
            show_controls: url.is_some() && !mode.is_preview(),
            url,
            height,
        }
    }
}

/// Placeholder layout rendered while the document is loading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkeletonLayout {
    pub cover_height: CoverHeight,
    pub line_widths: Vec<u8>,
}

impl Default for SkeletonLayout {
    fn default() -> Self {
        Self {
            cover_height: CoverHeight::Compact,
            line_widths: SKELETON_LINE_WIDTHS.to_vec(),
        }
    }
}

/// A ready document as shown on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentView {
    pub cover: CoverView,
    pub title: String,
    pub icon: Option<String>,
    /// Content the editor is seeded with.
    pub initial_content: Option<String>,
    pub editable: bool,
    /// Key the editor is mounted under; a new key remounts it.
    pub doc_key: DocumentId,
}

/// What a document page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PageView {
    Skeleton(SkeletonLayout),
    NotFound,
    Document(DocumentView),
}

impl PageView {
    /// Select the page view for a query outcome.
    pub fn from_query(query: &QueryState<Document>, mode: PageMode) -> Self {
        match query {
            QueryState::Loading => Self::Skeleton(SkeletonLayout::default()),
            QueryState::NotFound => Self::NotFound,
            QueryState::Ready(doc) => Self::Document(DocumentView {
                cover: CoverView::new(doc.cover_image.as_deref(), mode),
                title: doc.title.clone(),
                icon: doc.icon.clone(),
                initial_content: doc.content.clone(),
                editable: !mode.is_preview(),
                doc_key: doc.id,
            }),
        }
    }

    /// Short label for logs and summaries.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Skeleton(_) => "loading",
            Self::NotFound => "not found",
            Self::Document(_) => "document",
        }
    }
}
