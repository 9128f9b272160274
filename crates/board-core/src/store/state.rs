//! Serializable board state shared by the storage backends

use crate::article::{Article, ArticleDraft};
use crate::comment::{Comment, CommentDraft};
use crate::error::{BoardError, Result};
use crate::hashtag::{HashtagName, HashtagRecord};
use crate::types::{ArticleId, AuditInfo, Author, CommentId, HashtagId};
use super::ArticleCommit;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, VecDeque};
use tracing::debug;

/// Current board file schema version
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Article row; hashtags are kept as references into the hashtag table
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredArticle {
    title: String,
    content: String,
    #[serde(default)]
    hashtag_ids: BTreeSet<HashtagId>,
    author: Author,
    audit: AuditInfo,
}

/// Everything the board stores, with id sequences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardState {
    pub schema_version: u32,
    #[serde(default = "first_id")]
    next_article_id: u64,
    #[serde(default = "first_id")]
    next_comment_id: u64,
    #[serde(default = "first_id")]
    next_hashtag_id: u64,
    #[serde(default)]
    articles: BTreeMap<ArticleId, StoredArticle>,
    #[serde(default)]
    comments: BTreeMap<CommentId, Comment>,
    #[serde(default)]
    hashtags: BTreeMap<HashtagId, HashtagName>,
}

fn first_id() -> u64 {
    1
}

impl Default for BoardState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            next_article_id: 1,
            next_comment_id: 1,
            next_hashtag_id: 1,
            articles: BTreeMap::new(),
            comments: BTreeMap::new(),
            hashtags: BTreeMap::new(),
        }
    }
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject state written by a newer schema
    pub fn check_version(&self) -> Result<()> {
        if self.schema_version > CURRENT_SCHEMA_VERSION || self.schema_version == 0 {
            return Err(BoardError::UnsupportedSchemaVersion(self.schema_version));
        }
        Ok(())
    }

    // Hashtags

    pub fn find_hashtags_by_name(&self, names: &BTreeSet<HashtagName>) -> Vec<HashtagRecord> {
        self.hashtags
            .iter()
            .filter(|(_, name)| names.contains(*name))
            .map(|(id, name)| HashtagRecord::persisted(*id, name.clone()))
            .collect()
    }

    fn hashtag_id_by_name(&self, name: &HashtagName) -> Option<HashtagId> {
        self.hashtags
            .iter()
            .find(|(_, stored)| *stored == name)
            .map(|(id, _)| *id)
    }

    /// Store unsaved records and resolve every record to a live id.
    ///
    /// A name stored meanwhile is reused rather than duplicated; a record
    /// whose id was swept meanwhile is stored again under a new id.
    fn persist_hashtags(&mut self, records: &BTreeSet<HashtagRecord>) -> BTreeSet<HashtagId> {
        let mut ids = BTreeSet::new();

        for record in records {
            let live = record
                .id
                .filter(|id| self.hashtags.get(id) == Some(&record.name))
                .or_else(|| self.hashtag_id_by_name(&record.name));

            let id = match live {
                Some(id) => id,
                None => {
                    let id = HashtagId(self.next_hashtag_id);
                    self.next_hashtag_id += 1;
                    self.hashtags.insert(id, record.name.clone());
                    debug!("Stored hashtag '{}' as {}", record.name, id);
                    id
                }
            };
            ids.insert(id);
        }

        ids
    }

    fn is_hashtag_referenced(&self, id: HashtagId) -> bool {
        self.articles
            .values()
            .any(|article| article.hashtag_ids.contains(&id))
    }

    /// Check-then-delete in one step
    pub fn delete_hashtag_if_orphaned(&mut self, id: HashtagId) -> bool {
        if !self.hashtags.contains_key(&id) || self.is_hashtag_referenced(id) {
            return false;
        }
        self.hashtags.remove(&id).is_some()
    }

    pub fn list_hashtags(&self) -> Vec<HashtagRecord> {
        self.hashtags
            .iter()
            .map(|(id, name)| HashtagRecord::persisted(*id, name.clone()))
            .collect()
    }

    // Articles

    fn resolve_article(&self, id: ArticleId, stored: &StoredArticle) -> Article {
        let hashtags = stored
            .hashtag_ids
            .iter()
            .filter_map(|hid| {
                self.hashtags
                    .get(hid)
                    .map(|name| HashtagRecord::persisted(*hid, name.clone()))
            })
            .collect();

        Article {
            id,
            title: stored.title.clone(),
            content: stored.content.clone(),
            hashtags,
            author: stored.author.clone(),
            audit: stored.audit.clone(),
        }
    }

    pub fn insert_article(
        &mut self,
        draft: ArticleDraft,
        hashtags: BTreeSet<HashtagRecord>,
        audit: AuditInfo,
    ) -> Article {
        let id = ArticleId(self.next_article_id);
        self.next_article_id += 1;

        let hashtag_ids = self.persist_hashtags(&hashtags);
        let stored = StoredArticle {
            title: draft.title,
            content: draft.content,
            hashtag_ids,
            author: draft.author,
            audit,
        };

        let article = self.resolve_article(id, &stored);
        self.articles.insert(id, stored);
        article
    }

    pub fn update_article(&mut self, article: &Article) -> Result<ArticleCommit> {
        if !self.articles.contains_key(&article.id) {
            return Err(BoardError::ArticleNotFound(article.id));
        }

        let hashtag_ids = self.persist_hashtags(&article.hashtags);
        let stored = self
            .articles
            .get_mut(&article.id)
            .ok_or(BoardError::ArticleNotFound(article.id))?;
        stored.title = article.title.clone();
        stored.content = article.content.clone();
        stored.audit = article.audit.clone();
        let replaced_hashtags = std::mem::replace(&mut stored.hashtag_ids, hashtag_ids);

        let stored = stored.clone();
        Ok(ArticleCommit {
            article: self.resolve_article(article.id, &stored),
            replaced_hashtags,
        })
    }

    pub fn load_article(&self, id: ArticleId) -> Result<Article> {
        self.articles
            .get(&id)
            .map(|stored| self.resolve_article(id, stored))
            .ok_or(BoardError::ArticleNotFound(id))
    }

    /// Remove the article and every comment on it
    pub fn delete_article(&mut self, id: ArticleId) -> Result<BTreeSet<HashtagId>> {
        let stored = self
            .articles
            .remove(&id)
            .ok_or(BoardError::ArticleNotFound(id))?;
        self.comments.retain(|_, comment| comment.article_id != id);
        Ok(stored.hashtag_ids)
    }

    pub fn list_articles(&self) -> Vec<Article> {
        self.articles
            .iter()
            .map(|(id, stored)| self.resolve_article(*id, stored))
            .collect()
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    // Comments

    pub fn insert_comment(&mut self, draft: CommentDraft, audit: AuditInfo) -> Result<Comment> {
        if !self.articles.contains_key(&draft.article_id) {
            return Err(BoardError::ArticleNotFound(draft.article_id));
        }

        let id = CommentId(self.next_comment_id);

        if let Some(parent_id) = draft.parent_comment_id {
            let parent = self
                .comments
                .get(&parent_id)
                .ok_or(BoardError::CommentNotFound(parent_id))?;
            if parent.article_id != draft.article_id {
                return Err(BoardError::CrossArticleParent {
                    comment_id: id,
                    parent_id,
                });
            }
        }

        self.next_comment_id += 1;
        let comment = draft.into_comment(id, audit);
        self.comments.insert(id, comment.clone());
        Ok(comment)
    }

    /// Commit new content; article and parent links are never rewritten
    pub fn update_comment(&mut self, comment: &Comment) -> Result<()> {
        let stored = self
            .comments
            .get_mut(&comment.id)
            .ok_or(BoardError::CommentNotFound(comment.id))?;
        stored.content = comment.content.clone();
        stored.audit = comment.audit.clone();
        Ok(())
    }

    pub fn load_comment(&self, id: CommentId) -> Result<Comment> {
        self.comments
            .get(&id)
            .cloned()
            .ok_or(BoardError::CommentNotFound(id))
    }

    /// Remove a comment and all replies below it
    pub fn delete_comment(&mut self, id: CommentId) -> Result<Vec<CommentId>> {
        if !self.comments.contains_key(&id) {
            return Err(BoardError::CommentNotFound(id));
        }

        let mut removed = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if self.comments.remove(&current).is_none() {
                continue;
            }
            removed.push(current);
            queue.extend(
                self.comments
                    .values()
                    .filter(|c| c.parent_comment_id == Some(current))
                    .map(|c| c.id),
            );
        }

        Ok(removed)
    }

    pub fn comments_for_article(&self, article_id: ArticleId) -> Vec<Comment> {
        self.comments
            .values()
            .filter(|c| c.article_id == article_id)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use pretty_assertions::assert_eq;

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn tags(names: &[&str]) -> BTreeSet<HashtagRecord> {
        names
            .iter()
            .map(|n| HashtagRecord::unsaved(HashtagName::parse(n).unwrap()))
            .collect()
    }

    fn insert(state: &mut BoardState, content: &str, names: &[&str]) -> Article {
        state.insert_article(
            ArticleDraft::new("title", content, Author::new(alice())),
            tags(names),
            AuditInfo::now(&alice()),
        )
    }

    fn comment_draft(article_id: ArticleId, parent: Option<CommentId>) -> CommentDraft {
        CommentDraft {
            article_id,
            parent_comment_id: parent,
            content: "hello".into(),
            author: Author::new(alice()),
        }
    }

    #[test]
    fn test_insert_assigns_hashtag_ids_once_per_name() {
        let mut state = BoardState::new();
        let first = insert(&mut state, "#a #b", &["a", "b"]);
        let second = insert(&mut state, "#b", &["b"]);

        assert_eq!(first.hashtags.len(), 2);
        assert!(first.hashtags.iter().all(HashtagRecord::is_persisted));
        assert_eq!(state.list_hashtags().len(), 2);
        let b_first = first.hashtags.iter().find(|r| r.name.as_str() == "b").unwrap().id;
        assert_eq!(second.hashtags.iter().next().unwrap().id, b_first);
    }

    #[test]
    fn test_delete_if_orphaned_respects_references() {
        let mut state = BoardState::new();
        let article = insert(&mut state, "#a", &["a"]);
        let id = article.hashtag_ids().into_iter().next().unwrap();

        assert!(!state.delete_hashtag_if_orphaned(id));

        state.delete_article(article.id).unwrap();
        assert!(state.delete_hashtag_if_orphaned(id));
        assert!(!state.delete_hashtag_if_orphaned(id));
        assert!(!state.delete_hashtag_if_orphaned(HashtagId(999)));
    }

    #[test]
    fn test_update_with_swept_record_restores_it() {
        let mut state = BoardState::new();
        let mut article = insert(&mut state, "#a", &["a"]);
        let old_id = article.hashtag_ids().into_iter().next().unwrap();

        // Simulate the record being swept while the edit was in flight
        state.hashtags.remove(&old_id);

        article.content = "#a again".into();
        let updated = state.update_article(&article).unwrap().article;
        let new_id = updated.hashtag_ids().into_iter().next().unwrap();
        assert_ne!(new_id, old_id);
        assert_eq!(updated.hashtag_names(), vec!["a"]);
    }

    #[test]
    fn test_update_reports_replaced_ids_from_the_stored_row() {
        let mut state = BoardState::new();
        let loaded = insert(&mut state, "#a", &["a"]);

        // Another edit commits first
        let mut first = loaded.clone();
        first.hashtags = tags(&["b"]);
        let first = state.update_article(&first).unwrap();
        let b = first.article.hashtag_ids().into_iter().next().unwrap();
        assert_eq!(first.replaced_hashtags, loaded.hashtag_ids());

        let mut second = loaded.clone();
        second.hashtags = tags(&["c"]);
        let second = state.update_article(&second).unwrap();
        assert_eq!(second.replaced_hashtags, BTreeSet::from([b]));
        assert!(state.delete_hashtag_if_orphaned(b));
    }

    #[test]
    fn test_delete_returns_hashtag_ids() {
        let mut state = BoardState::new();
        let article = insert(&mut state, "#a #b", &["a", "b"]);
        assert_eq!(state.delete_article(article.id).unwrap(), article.hashtag_ids());
    }

    #[test]
    fn test_update_missing_article() {
        let mut state = BoardState::new();
        let mut article = insert(&mut state, "", &[]);
        article.id = ArticleId(42);
        assert!(matches!(
            state.update_article(&article),
            Err(BoardError::ArticleNotFound(ArticleId(42)))
        ));
    }

    #[test]
    fn test_delete_article_cascades_comments() {
        let mut state = BoardState::new();
        let article = insert(&mut state, "", &[]);
        let other = insert(&mut state, "", &[]);
        state.insert_comment(comment_draft(article.id, None), AuditInfo::now(&alice())).unwrap();
        state.insert_comment(comment_draft(other.id, None), AuditInfo::now(&alice())).unwrap();

        state.delete_article(article.id).unwrap();
        assert!(state.comments_for_article(article.id).is_empty());
        assert_eq!(state.comments_for_article(other.id).len(), 1);
    }

    #[test]
    fn test_reply_must_share_article() {
        let mut state = BoardState::new();
        let first = insert(&mut state, "", &[]);
        let second = insert(&mut state, "", &[]);
        let root = state
            .insert_comment(comment_draft(first.id, None), AuditInfo::now(&alice()))
            .unwrap();

        let result = state.insert_comment(comment_draft(second.id, Some(root.id)), AuditInfo::now(&alice()));
        assert!(matches!(result, Err(BoardError::CrossArticleParent { .. })));

        let result = state.insert_comment(comment_draft(first.id, Some(CommentId(77))), AuditInfo::now(&alice()));
        assert!(matches!(result, Err(BoardError::CommentNotFound(CommentId(77)))));
    }

    #[test]
    fn test_delete_comment_cascades_replies() {
        let mut state = BoardState::new();
        let article = insert(&mut state, "", &[]);
        let audit = AuditInfo::now(&alice());
        let root = state.insert_comment(comment_draft(article.id, None), audit.clone()).unwrap();
        let reply = state
            .insert_comment(comment_draft(article.id, Some(root.id)), audit.clone())
            .unwrap();
        let nested = state
            .insert_comment(comment_draft(article.id, Some(reply.id)), audit.clone())
            .unwrap();
        let other = state.insert_comment(comment_draft(article.id, None), audit).unwrap();

        let removed = state.delete_comment(root.id).unwrap();
        assert_eq!(removed, vec![root.id, reply.id, nested.id]);
        assert_eq!(state.comments_for_article(article.id), vec![other]);
    }

    #[test]
    fn test_update_comment_keeps_parent() {
        let mut state = BoardState::new();
        let article = insert(&mut state, "", &[]);
        let audit = AuditInfo::now(&alice());
        let root = state.insert_comment(comment_draft(article.id, None), audit.clone()).unwrap();
        let mut reply = state
            .insert_comment(comment_draft(article.id, Some(root.id)), audit)
            .unwrap();

        reply.content = "edited".into();
        reply.parent_comment_id = None;
        state.update_comment(&reply).unwrap();

        let stored = state.load_comment(reply.id).unwrap();
        assert_eq!(stored.content, "edited");
        assert_eq!(stored.parent_comment_id, Some(root.id));
    }

    #[test]
    fn test_state_serialization() {
        let mut state = BoardState::new();
        insert(&mut state, "#a", &["a"]);

        let json = serde_json::to_string(&state).unwrap();
        let restored: BoardState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.article_count(), 1);
        assert_eq!(restored.list_hashtags().len(), 1);
        assert!(restored.check_version().is_ok());
    }

    #[test]
    fn test_future_schema_rejected() {
        let state = BoardState {
            schema_version: CURRENT_SCHEMA_VERSION + 1,
            ..BoardState::default()
        };
        assert!(matches!(
            state.check_version(),
            Err(BoardError::UnsupportedSchemaVersion(_))
        ));
    }
}
