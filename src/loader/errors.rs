//! Error types for book loading
//!
//! Every loader failure aborts the render pipeline. The `Display` text is the
//! single user-visible message shown in place of the book.

use thiserror::Error;

/// Why a book failed to load
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadFailureReason {
    Transport,
    Parse,
    Schema,
}

/// Typed loader failure
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LoadFailure {
    /// No identifier was supplied
    #[error("Error loading book data: No book file specified. Please add ?book=filename.json to the URL")]
    MissingIdentifier,

    /// Resource unreachable or non-success status
    #[error("Error loading book data: Failed to load book: {detail}")]
    Transport { detail: String },

    /// Payload is not valid JSON
    #[error("Error loading book data: {detail}")]
    Parse { detail: String },

    /// Payload parses but is not a book
    #[error("Error loading book data: Invalid book format. {detail}")]
    Schema { detail: String },
}

impl LoadFailure {
    pub fn reason(&self) -> LoadFailureReason {
        match self {
            LoadFailure::MissingIdentifier | LoadFailure::Transport { .. } => LoadFailureReason::Transport,
            LoadFailure::Parse { .. } => LoadFailureReason::Parse,
            LoadFailure::Schema { .. } => LoadFailureReason::Schema,
        }
    }

    pub fn transport(detail: impl Into<String>) -> Self {
        LoadFailure::Transport { detail: detail.into() }
    }

    pub fn schema(detail: impl Into<String>) -> Self {
        LoadFailure::Schema { detail: detail.into() }
    }
}

impl From<serde_json::Error> for LoadFailure {
    fn from(err: serde_json::Error) -> Self {
        LoadFailure::Parse { detail: err.to_string() }
    }
}
