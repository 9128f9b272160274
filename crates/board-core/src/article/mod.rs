//! Article module
//!
//! Article models, validation, search and the service that keeps hashtag
//! associations consistent with article content.

pub mod model;
pub mod search;
pub mod service;
pub mod validator;

pub use model::*;
pub use search::SearchType;
pub use service::{ArticleService, ArticleUpdateOutcome};
pub use validator::ArticleValidator;
