//! Comment system module
//!
//! Handles comment models, validation, thread assembly and the comment service.

pub mod builder;
pub mod model;
pub mod service;
pub mod tree;
pub mod validator;

pub use builder::CommentBuilder;
pub use model::*;
pub use service::CommentService;
pub use tree::{CommentThread, CommentTreeBuilder};
pub use validator::CommentValidator;
