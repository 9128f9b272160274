//! Comment service for CRUD operations

use super::model::{Comment, CommentDraft};
use super::tree::{CommentThread, CommentTreeBuilder};
use super::validator::CommentValidator;
use crate::error::{BoardError, Result};
use crate::store::BoardStorage;
use crate::types::{ArticleId, AuditInfo, CommentId, UserId};
use std::sync::Arc;
use tracing::{info, warn};

/// Manager for comments on articles
pub struct CommentService<S: BoardStorage> {
    /// Storage backend
    storage: Arc<S>,
    validator: CommentValidator,
}

impl<S: BoardStorage> CommentService<S> {
    /// Create a new comment service with the given storage
    pub fn new(storage: S) -> Self {
        Self::with_storage(Arc::new(storage))
    }

    /// Create a new comment service with shared storage
    pub fn with_storage(storage: Arc<S>) -> Self {
        Self {
            storage,
            validator: CommentValidator::default(),
        }
    }

    /// Replace the default validator
    pub fn with_validator(mut self, validator: CommentValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Flat comments of an article, oldest first
    pub fn list(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        self.storage.load_article(article_id)?;
        let mut comments = self.storage.list_comments_for_article(article_id)?;
        comments.sort_by(|a, b| {
            a.created_at()
                .cmp(&b.created_at())
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(comments)
    }

    /// Reply tree of an article; unplaceable comments are left out and reported
    pub fn thread(&self, article_id: ArticleId) -> Result<CommentThread> {
        self.storage.load_article(article_id)?;
        let thread =
            CommentTreeBuilder::assemble(self.storage.list_comments_for_article(article_id)?);
        if !thread.is_complete() {
            warn!(
                "Article {} has {} comment(s) that cannot be placed in its thread",
                article_id,
                thread.excluded.len()
            );
        }
        Ok(thread)
    }

    /// Add a comment written by `actor`
    pub fn add(&self, actor: &UserId, draft: CommentDraft) -> Result<Comment> {
        self.validator.validate_content(&draft.content)?;
        if &draft.author.user_id != actor {
            return Err(BoardError::PermissionDenied {
                user_id: actor.clone(),
                resource: format!("comments of {}", draft.author.user_id),
            });
        }

        self.storage.load_article(draft.article_id)?;
        let comment = self.storage.insert_comment(draft, AuditInfo::now(actor))?;

        info!(
            "Added comment {} to article {}",
            comment.id, comment.article_id
        );
        Ok(comment)
    }

    /// Replace the content of a comment; only its author may do so
    pub fn edit(&self, actor: &UserId, id: CommentId, content: impl Into<String>) -> Result<Comment> {
        let content = content.into();
        self.validator.validate_content(&content)?;

        let mut comment = self.storage.load_comment(id)?;
        ensure_author(&comment, actor)?;

        comment.update_content(content, actor);
        self.storage.update_comment(&comment)?;
        Ok(comment)
    }

    /// Delete a comment and its replies; only its author may do so
    pub fn delete(&self, actor: &UserId, id: CommentId) -> Result<Vec<CommentId>> {
        let comment = self.storage.load_comment(id)?;
        ensure_author(&comment, actor)?;

        let removed = self.storage.delete_comment(id)?;
        info!(
            "Deleted comment {} with {} reply comment(s)",
            id,
            removed.len().saturating_sub(1)
        );
        Ok(removed)
    }
}

fn ensure_author(comment: &Comment, actor: &UserId) -> Result<()> {
    if comment.is_written_by(actor) {
        Ok(())
    } else {
        Err(BoardError::PermissionDenied {
            user_id: actor.clone(),
            resource: format!("comment {}", comment.id),
        })
    }
}
