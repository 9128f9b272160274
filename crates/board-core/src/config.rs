//! Configuration management for board-service

use crate::error::{BoardError, Result};
use crate::pagination::{PaginationWindow, DEFAULT_BAR_LENGTH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Board settings
    pub board: BoardConfig,
    /// Pagination bar settings
    pub pagination: PaginationConfig,
}

impl Config {
    /// Load configuration from a TOML file, falling back to defaults when absent
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| BoardError::Toml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write configuration as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| BoardError::Toml(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.board.page_size == 0 {
            return Err(BoardError::Config("board.page_size must be positive".to_string()));
        }
        if self.board.max_title_length == 0
            || self.board.max_content_length == 0
            || self.board.max_comment_length == 0
        {
            return Err(BoardError::Config(
                "board length limits must be positive".to_string(),
            ));
        }
        self.pagination.window().map(|_| ()).map_err(|e| {
            BoardError::Config(format!("pagination.bar_length: {}", e))
        })
    }
}

/// Board-related configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Articles per listing page
    pub page_size: usize,
    /// Maximum article title length
    pub max_title_length: usize,
    /// Maximum article body length
    pub max_content_length: usize,
    /// Maximum comment length
    pub max_comment_length: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            max_title_length: 255,
            max_content_length: 10000,
            max_comment_length: 500,
        }
    }
}

/// Pagination bar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Number of page links shown (odd)
    pub bar_length: usize,
    /// Pull the window back near the last page so it stays full length
    pub backfill: bool,
}

impl PaginationConfig {
    /// Build the window calculator described by this section
    pub fn window(&self) -> Result<PaginationWindow> {
        Ok(PaginationWindow::new(self.bar_length)?.with_backfill(self.backfill))
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            bar_length: DEFAULT_BAR_LENGTH,
            backfill: true,
        }
    }
}
