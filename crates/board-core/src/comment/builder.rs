//! Comment builder for fluent API

use super::model::CommentDraft;
use crate::error::{BoardError, Result};
use crate::types::{ArticleId, Author, CommentId};

/// Builder for comment drafts
pub struct CommentBuilder {
    article_id: ArticleId,
    parent_comment_id: Option<CommentId>,
    content: Option<String>,
    author: Author,
}

impl CommentBuilder {
    /// Create a new builder for a top-level comment on an article
    pub fn new(article_id: ArticleId, author: Author) -> Self {
        Self {
            article_id,
            parent_comment_id: None,
            content: None,
            author,
        }
    }

    /// Set the comment content
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Make the comment a reply to `parent`
    pub fn reply_to(mut self, parent: CommentId) -> Self {
        self.parent_comment_id = Some(parent);
        self
    }

    /// Set an optional parent
    pub fn parent(mut self, parent: Option<CommentId>) -> Self {
        self.parent_comment_id = parent;
        self
    }

    /// Build the draft
    pub fn build(self) -> Result<CommentDraft> {
        let content = self.content.ok_or_else(|| {
            BoardError::Validation("Comment content is required".to_string())
        })?;

        if content.trim().is_empty() {
            return Err(BoardError::Validation(
                "Comment content cannot be empty".to_string(),
            ));
        }

        Ok(CommentDraft {
            article_id: self.article_id,
            parent_comment_id: self.parent_comment_id,
            content,
            author: self.author,
        })
    }
}
