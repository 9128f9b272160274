//! In-memory storage

use super::state::BoardState;
use super::StateStore;
use crate::error::{BoardError, Result};
use std::sync::RwLock;

/// In-memory storage, used by tests and short-lived boards
pub struct MemoryStorage {
    state: RwLock<BoardState>,
}

impl MemoryStorage {
    /// Create an empty in-memory storage
    pub fn new() -> Self {
        Self::with_state(BoardState::new())
    }

    /// Start from an existing state
    pub fn with_state(state: BoardState) -> Self {
        Self {
            state: RwLock::new(state),
        }
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> Result<BoardState> {
        self.read(|state| Ok(state.clone()))
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned() -> BoardError {
    BoardError::Storage("board state lock poisoned".to_string())
}

impl StateStore for MemoryStorage {
    fn read<T>(&self, f: impl FnOnce(&BoardState) -> Result<T>) -> Result<T> {
        let state = self.state.read().map_err(|_| poisoned())?;
        f(&state)
    }

    fn write<T>(&self, f: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T> {
        let mut state = self.state.write().map_err(|_| poisoned())?;
        let mut working = state.clone();
        let value = f(&mut working)?;
        *state = working;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::ArticleDraft;
    use crate::comment::CommentDraft;
    use crate::store::{BoardStorage, HashtagStore};
    use crate::types::{ArticleId, AuditInfo, Author, UserId};
    use std::collections::BTreeSet;
    use std::sync::Arc;

    fn alice() -> UserId {
        UserId::new("alice").unwrap()
    }

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        let article = storage
            .insert_article(
                ArticleDraft::new("Hello", "body", Author::new(alice())),
                BTreeSet::new(),
                AuditInfo::now(&alice()),
            )
            .unwrap();

        let loaded = storage.load_article(article.id).unwrap();
        assert_eq!(loaded, article);
        assert_eq!(storage.count_articles().unwrap(), 1);
    }

    #[test]
    fn test_failed_write_leaves_state_untouched() {
        let storage = MemoryStorage::new();
        let draft = CommentDraft {
            article_id: ArticleId(9),
            parent_comment_id: None,
            content: "orphan".into(),
            author: Author::new(alice()),
        };

        assert!(storage.insert_comment(draft, AuditInfo::now(&alice())).is_err());
        assert!(storage.list_comments_for_article(ArticleId(9)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_hashtag_delete_is_noop() {
        let storage = MemoryStorage::new();
        assert!(!storage
            .delete_hashtag_if_orphaned(crate::types::HashtagId(1))
            .unwrap());
    }

    #[test]
    fn test_concurrent_inserts_get_distinct_ids() {
        let storage = Arc::new(MemoryStorage::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let storage = Arc::clone(&storage);
                std::thread::spawn(move || {
                    storage
                        .insert_article(
                            ArticleDraft::new(format!("t{}", i), "", Author::new(alice())),
                            BTreeSet::new(),
                            AuditInfo::now(&alice()),
                        )
                        .unwrap()
                        .id
                })
            })
            .collect();

        let ids: BTreeSet<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(ids.len(), 8);
    }
}
