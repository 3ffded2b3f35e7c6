//! Error types for word list queries.

/// A specialized Result type for word list queries.
pub type Result<T> = std::result::Result<T, WordListError>;

/// Errors that can occur when querying a [`WordList`](crate::WordList).
///
/// Absence of a single word is not an error: [`remove`](crate::WordList::remove)
/// and [`get_count`](crate::WordList::get_count) report it through their return
/// values instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WordListError {
    /// An aggregate that needs at least one word was requested on an empty list.
    #[error("word list is empty")]
    EmptyCollection,
}
