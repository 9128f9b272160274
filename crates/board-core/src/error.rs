//! Error types for board-service

use crate::types::{ArticleId, CommentId, HashtagId, UserId};
use thiserror::Error;

/// Main error type for board-service
#[derive(Debug, Error)]
pub enum BoardError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(String),

    /// Article not found
    #[error("Article not found: {0}")]
    ArticleNotFound(ArticleId),

    /// Comment not found
    #[error("Comment not found: {0}")]
    CommentNotFound(CommentId),

    /// Hashtag not found
    #[error("Hashtag not found: {0}")]
    HashtagNotFound(HashtagId),

    /// A comment points at a parent that is not part of the thread
    #[error("Comment {comment_id} references missing parent comment {parent_id}")]
    DanglingParentReference {
        comment_id: CommentId,
        parent_id: CommentId,
    },

    /// A comment is only reachable through a parent cycle
    #[error("Comment {comment_id} is part of a parent cycle")]
    CommentCycle { comment_id: CommentId },

    /// A reply points at a comment of another article
    #[error("Comment {comment_id} replies to comment {parent_id} of another article")]
    CrossArticleParent {
        comment_id: CommentId,
        parent_id: CommentId,
    },

    /// Negative page index or page count
    #[error("Invalid pagination input: current page {current_page}, total pages {total_pages}")]
    InvalidPaginationInput { current_page: i64, total_pages: i64 },

    /// Pagination bar length must be odd and positive
    #[error("Invalid pagination window size: {0} (must be odd and positive)")]
    InvalidWindowSize(usize),

    /// Actor is not allowed to touch the resource
    #[error("User '{user_id}' is not allowed to modify {resource}")]
    PermissionDenied { user_id: UserId, resource: String },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Unsupported schema version
    #[error("Unsupported schema version: {0}")]
    UnsupportedSchemaVersion(u32),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<BoardError>,
    },
}

impl BoardError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        BoardError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error means the addressed entity does not exist
    pub fn is_not_found(&self) -> bool {
        match self {
            BoardError::ArticleNotFound(_)
            | BoardError::CommentNotFound(_)
            | BoardError::HashtagNotFound(_) => true,
            BoardError::WithContext { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

/// Result type alias for board-service
pub type Result<T> = std::result::Result<T, BoardError>;
