//! Storage traits and abstractions
//!
//! [`HashtagStore`] carries the hashtag collaborators the reconciler needs;
//! [`BoardStorage`] adds articles and comments on top. Backends that keep a
//! whole [`BoardState`] implement [`StateStore`] and get both traits.

mod memory;
mod state;

pub use memory::MemoryStorage;
pub use state::{BoardState, CURRENT_SCHEMA_VERSION};

use crate::article::{Article, ArticleDraft};
use crate::comment::{Comment, CommentDraft};
use crate::error::Result;
use crate::hashtag::{HashtagName, HashtagRecord};
use crate::types::{ArticleId, AuditInfo, CommentId, HashtagId};
use std::collections::BTreeSet;

/// Hashtag lookup, creation and conditional deletion
pub trait HashtagStore: Send + Sync {
    /// Existing records for any of `names`; unknown names are simply absent
    fn find_hashtags_by_name(&self, names: &BTreeSet<HashtagName>) -> Result<Vec<HashtagRecord>>;

    /// A new record for `name` that is not stored yet
    fn create_hashtag(&self, name: HashtagName) -> Result<HashtagRecord> {
        Ok(HashtagRecord::unsaved(name))
    }

    /// Delete the record if no article references it.
    ///
    /// Returns whether a record was deleted. Calling it for a record that is
    /// gone or still referenced is a no-op, not an error.
    fn delete_hashtag_if_orphaned(&self, id: HashtagId) -> Result<bool>;
}

/// An article as committed by [`BoardStorage::update_article`]
#[derive(Debug, Clone)]
pub struct ArticleCommit {
    pub article: Article,
    /// Hashtag ids the stored article referenced right before the commit
    pub replaced_hashtags: BTreeSet<HashtagId>,
}

/// Trait for board storage implementations
pub trait BoardStorage: HashtagStore {
    /// Store a new article; unsaved hashtag records get ids
    fn insert_article(
        &self,
        draft: ArticleDraft,
        hashtags: BTreeSet<HashtagRecord>,
        audit: AuditInfo,
    ) -> Result<Article>;

    /// Commit title, content and hashtag associations of an existing article.
    ///
    /// The replaced hashtag ids are read inside the same write, so they
    /// include associations committed by a concurrent edit.
    fn update_article(&self, article: &Article) -> Result<ArticleCommit>;

    /// Load an article by ID
    fn load_article(&self, id: ArticleId) -> Result<Article>;

    /// Delete an article and its comments, returning the hashtag ids it
    /// referenced when it was removed
    fn delete_article(&self, id: ArticleId) -> Result<BTreeSet<HashtagId>>;

    /// List all articles
    fn list_articles(&self) -> Result<Vec<Article>>;

    /// Number of stored articles
    fn count_articles(&self) -> Result<usize> {
        Ok(self.list_articles()?.len())
    }

    /// Store a new comment; a parent must exist on the same article
    fn insert_comment(&self, draft: CommentDraft, audit: AuditInfo) -> Result<Comment>;

    /// Commit the content of an existing comment
    fn update_comment(&self, comment: &Comment) -> Result<()>;

    /// Load a comment by ID
    fn load_comment(&self, id: CommentId) -> Result<Comment>;

    /// Delete a comment and every reply below it, returning the removed ids
    fn delete_comment(&self, id: CommentId) -> Result<Vec<CommentId>>;

    /// Flat, unordered comments of an article
    fn list_comments_for_article(&self, article_id: ArticleId) -> Result<Vec<Comment>>;

    /// All stored hashtag records
    fn list_hashtags(&self) -> Result<Vec<HashtagRecord>>;
}

/// Backend holding a whole [`BoardState`] behind its own synchronization
pub trait StateStore: Send + Sync {
    /// Run `f` against a consistent snapshot
    fn read<T>(&self, f: impl FnOnce(&BoardState) -> Result<T>) -> Result<T>;

    /// Run `f` exclusively; the change is committed only if `f` succeeds
    fn write<T>(&self, f: impl FnOnce(&mut BoardState) -> Result<T>) -> Result<T>;
}

impl<S: StateStore> HashtagStore for S {
    fn find_hashtags_by_name(&self, names: &BTreeSet<HashtagName>) -> Result<Vec<HashtagRecord>> {
        self.read(|state| Ok(state.find_hashtags_by_name(names)))
    }

    fn delete_hashtag_if_orphaned(&self, id: HashtagId) -> Result<bool> {
        self.write(|state| Ok(state.delete_hashtag_if_orphaned(id)))
    }
}

impl<S: StateStore> BoardStorage for S {
    fn insert_article(
        &self,
        draft: ArticleDraft,
        hashtags: BTreeSet<HashtagRecord>,
        audit: AuditInfo,
    ) -> Result<Article> {
        self.write(|state| Ok(state.insert_article(draft, hashtags, audit)))
    }

    fn update_article(&self, article: &Article) -> Result<ArticleCommit> {
        self.write(|state| state.update_article(article))
    }

    fn load_article(&self, id: ArticleId) -> Result<Article> {
        self.read(|state| state.load_article(id))
    }

    fn delete_article(&self, id: ArticleId) -> Result<BTreeSet<HashtagId>> {
        self.write(|state| state.delete_article(id))
    }

    fn list_articles(&self) -> Result<Vec<Article>> {
        self.read(|state| Ok(state.list_articles()))
    }

    fn count_articles(&self) -> Result<usize> {
        self.read(|state| Ok(state.article_count()))
    }

    fn insert_comment(&self, draft: CommentDraft, audit: AuditInfo) -> Result<Comment> {
        self.write(|state| state.insert_comment(draft, audit))
    }

    fn update_comment(&self, comment: &Comment) -> Result<()> {
        self.write(|state| state.update_comment(comment))
    }

    fn load_comment(&self, id: CommentId) -> Result<Comment> {
        self.read(|state| state.load_comment(id))
    }

    fn delete_comment(&self, id: CommentId) -> Result<Vec<CommentId>> {
        self.write(|state| state.delete_comment(id))
    }

    fn list_comments_for_article(&self, article_id: ArticleId) -> Result<Vec<Comment>> {
        self.read(|state| Ok(state.comments_for_article(article_id)))
    }

    fn list_hashtags(&self) -> Result<Vec<HashtagRecord>> {
        self.read(|state| Ok(state.list_hashtags()))
    }
}
