//! Article data models

use crate::comment::CommentNode;
use crate::hashtag::HashtagRecord;
use crate::types::{ArticleId, AuditInfo, Author, HashtagId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A board article with the hashtags derived from its content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub content: String,
    /// Hashtags referenced by the content, unordered
    #[serde(default)]
    pub hashtags: BTreeSet<HashtagRecord>,
    pub author: Author,
    pub audit: AuditInfo,
}

impl Article {
    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at
    }

    pub fn is_written_by(&self, user_id: &UserId) -> bool {
        &self.author.user_id == user_id
    }

    /// Ids of the associated hashtag records that are already stored
    pub fn hashtag_ids(&self) -> BTreeSet<HashtagId> {
        self.hashtags.iter().filter_map(|record| record.id).collect()
    }

    /// Associated hashtag names, sorted
    pub fn hashtag_names(&self) -> Vec<&str> {
        self.hashtags.iter().map(|record| record.name.as_str()).collect()
    }
}

/// Input for creating an article
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleDraft {
    pub title: String,
    pub content: String,
    pub author: Author,
}

impl ArticleDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, author: Author) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author,
        }
    }
}

/// Partial article edit; `None` leaves the field as it is
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl ArticleUpdate {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// An article together with its assembled comment thread
#[derive(Debug, Serialize)]
pub struct ArticleWithComments {
    pub article: Article,
    /// Top-level comments, newest first, replies nested
    pub comments: Vec<CommentNode>,
    /// Comments left out of the thread because of inconsistent parents
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_comments: Vec<String>,
}

impl ArticleWithComments {
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(|root| 1 + root.reply_count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hashtag::HashtagName;

    #[test]
    fn test_hashtag_ids_skip_unsaved() {
        let alice = UserId::new("alice").unwrap();
        let article = Article {
            id: ArticleId(1),
            title: "t".into(),
            content: "#a #b".into(),
            hashtags: BTreeSet::from([
                HashtagRecord::persisted(HashtagId(4), HashtagName::parse("a").unwrap()),
                HashtagRecord::unsaved(HashtagName::parse("b").unwrap()),
            ]),
            author: Author::new(alice.clone()),
            audit: AuditInfo::now(&alice),
        };

        assert_eq!(article.hashtag_ids(), BTreeSet::from([HashtagId(4)]));
        assert_eq!(article.hashtag_names(), vec!["a", "b"]);
        assert!(article.is_written_by(&alice));
    }

    #[test]
    fn test_update_builder() {
        assert!(ArticleUpdate::default().is_empty());
        let update = ArticleUpdate::default().content("#x");
        assert!(!update.is_empty());
        assert!(update.title.is_none());
    }
}
