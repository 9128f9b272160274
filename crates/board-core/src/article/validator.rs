//! Article validation

use crate::config::BoardConfig;
use crate::error::{BoardError, Result};

/// Maximum title length (default)
pub const MAX_TITLE_LENGTH: usize = 255;

/// Maximum content length (default)
pub const MAX_CONTENT_LENGTH: usize = 10000;

/// Validator for article title and content
pub struct ArticleValidator {
    max_title_length: usize,
    max_content_length: usize,
}

impl ArticleValidator {
    /// Create a new validator with default settings
    pub fn new() -> Self {
        Self {
            max_title_length: MAX_TITLE_LENGTH,
            max_content_length: MAX_CONTENT_LENGTH,
        }
    }

    /// Limits taken from the `[board]` config section
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            max_title_length: config.max_title_length,
            max_content_length: config.max_content_length,
        }
    }

    pub fn validate_title(&self, title: &str) -> Result<()> {
        check("Article title", title, self.max_title_length)
    }

    pub fn validate_content(&self, content: &str) -> Result<()> {
        check("Article content", content, self.max_content_length)
    }
}

impl Default for ArticleValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn check(field: &str, value: &str, max_length: usize) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BoardError::Validation(format!("{} cannot be empty", field)));
    }

    if value.chars().count() > max_length {
        return Err(BoardError::Validation(format!(
            "{} exceeds maximum length of {} characters",
            field, max_length
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_rejected() {
        let validator = ArticleValidator::new();
        assert!(validator.validate_title("  ").is_err());
        assert!(validator.validate_content("").is_err());
        assert!(validator.validate_title("Hello").is_ok());
    }

    #[test]
    fn test_limits_from_config() {
        let config = BoardConfig {
            max_title_length: 5,
            ..BoardConfig::default()
        };
        let validator = ArticleValidator::from_config(&config);
        assert!(validator.validate_title("short").is_ok());
        assert!(validator.validate_title("too long").is_err());
    }
}
