//! Hashtag module
//!
//! Extracts hashtags from article text and keeps article/hashtag associations
//! in sync, deleting records that lose their last article.

pub mod extractor;
pub mod model;
pub mod reconciler;

pub use extractor::extract;
pub use model::{HashtagName, HashtagRecord, HASHTAG_MARKER};
pub use reconciler::{HashtagDiff, HashtagReconciler, SweepReport};
