//! Comment validation

use crate::error::{BoardError, Result};

/// Maximum comment length (default)
pub const MAX_COMMENT_LENGTH: usize = 500;

/// Validator for comment content
pub struct CommentValidator {
    max_length: usize,
}

impl CommentValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_length: MAX_COMMENT_LENGTH,
        }
    }

    /// Create a new validator with custom max length
    pub fn with_max_length(max_length: usize) -> Self {
        Self { max_length }
    }

    /// Validate comment content
    pub fn validate_content(&self, content: &str) -> Result<()> {
        let trimmed = content.trim();

        if trimmed.is_empty() {
            return Err(BoardError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        if trimmed.chars().count() > self.max_length {
            return Err(BoardError::Validation(format!(
                "Comment content exceeds maximum length of {} characters",
                self.max_length
            )));
        }

        Ok(())
    }
}

impl Default for CommentValidator {
    fn default() -> Self {
        Self::new()
    }
}
