//! Reactive query outcome.

use serde::{Deserialize, Serialize};

/// State of a reactive read against the document store.
///
/// A subscription starts in [`QueryState::Loading`] and moves to one of the
/// two terminal states once the store answers. It may move between
/// `Ready` values (and to `NotFound`) whenever the remote record changes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum QueryState<T> {
    /// The store has not answered yet.
    #[default]
    Loading,
    /// The store answered and the record does not exist.
    NotFound,
    /// The store answered with a value.
    Ready(T),
}

impl<T> QueryState<T> {
    #[inline]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }

    /// Borrow the value if the query is ready.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    /// Convert a resolved lookup into a terminal state.
    pub fn from_lookup(value: Option<T>) -> Self {
        value.map_or(Self::NotFound, Self::Ready)
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> QueryState<U> {
        match self {
            Self::Loading => QueryState::Loading,
            Self::NotFound => QueryState::NotFound,
            Self::Ready(value) => QueryState::Ready(f(value)),
        }
    }
}
