//! Comment data models

use crate::types::{ArticleId, AuditInfo, Author, CommentId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment on an article, optionally replying to another comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique comment identifier
    pub id: CommentId,
    /// Article the comment belongs to
    pub article_id: ArticleId,
    /// Comment this one replies to; fixed at creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<CommentId>,
    /// Comment content
    pub content: String,
    /// Who wrote it
    pub author: Author,
    /// Creation and modification stamps
    pub audit: AuditInfo,
}

impl Comment {
    /// When the comment was created
    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at
    }

    pub fn is_reply(&self) -> bool {
        self.parent_comment_id.is_some()
    }

    pub fn is_written_by(&self, user_id: &UserId) -> bool {
        &self.author.user_id == user_id
    }

    /// Replace the content and stamp the modification; the parent never changes
    pub fn update_content(&mut self, content: impl Into<String>, actor: &UserId) {
        self.content = content.into();
        self.audit.touch(actor);
    }
}

/// A comment that has not been stored yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentDraft {
    pub article_id: ArticleId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<CommentId>,
    pub content: String,
    pub author: Author,
}

impl CommentDraft {
    /// Turn the draft into a stored comment
    pub fn into_comment(self, id: CommentId, audit: AuditInfo) -> Comment {
        Comment {
            id,
            article_id: self.article_id,
            parent_comment_id: self.parent_comment_id,
            content: self.content,
            author: self.author,
            audit,
        }
    }
}

/// A comment with its replies, rebuilt on every read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentNode {
    #[serde(flatten)]
    pub comment: Comment,
    /// Direct replies, oldest first
    pub children: Vec<CommentNode>,
}

impl CommentNode {
    pub fn new(comment: Comment) -> Self {
        Self {
            comment,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> CommentId {
        self.comment.id
    }

    /// Number of replies below this node, at any depth
    pub fn reply_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&CommentNode> = vec![self];
        while let Some(node) = stack.pop() {
            count += node.children.len();
            stack.extend(node.children.iter());
        }
        count
    }

    /// Pre-order walk yielding each comment with its depth (0 for this node)
    pub fn walk(&self) -> Vec<(usize, &Comment)> {
        let mut out = Vec::new();
        let mut stack: Vec<(usize, &CommentNode)> = vec![(0, self)];
        while let Some((depth, node)) = stack.pop() {
            out.push((depth, &node.comment));
            for child in node.children.iter().rev() {
                stack.push((depth + 1, child));
            }
        }
        out
    }
}

// Deep reply chains would otherwise be dropped recursively
impl Drop for CommentNode {
    fn drop(&mut self) {
        let mut stack = std::mem::take(&mut self.children);
        while let Some(mut node) = stack.pop() {
            stack.append(&mut node.children);
        }
    }
}
