//! board-core - Core library for board-service
//!
//! This crate provides the core logic of a discussion board: hashtag
//! extraction and reconciliation, comment thread assembly, the pagination
//! window, and the article and comment services built on top of them.

pub mod error;
pub mod types;
pub mod config;
pub mod pagination;
pub mod hashtag;
pub mod comment;
pub mod article;
pub mod store;

pub use error::{BoardError, Result};
pub use types::*;
