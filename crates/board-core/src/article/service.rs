//! Article service for CRUD operations
//!
//! Every write keeps the article's hashtag associations equal to the
//! hashtags in its content. Records that lose their last article are swept
//! after the change is committed; a failed sweep never undoes the change.

use super::model::{Article, ArticleDraft, ArticleUpdate, ArticleWithComments};
use super::search::{ArticleFilter, SearchType};
use super::validator::ArticleValidator;
use crate::comment::CommentTreeBuilder;
use crate::error::{BoardError, Result};
use crate::hashtag::{HashtagDiff, HashtagName, HashtagReconciler, SweepReport};
use crate::pagination::{Page, PageRequest};
use crate::store::BoardStorage;
use crate::types::{ArticleId, AuditInfo, UserId};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Result of an article edit
#[derive(Debug, Clone, Serialize)]
pub struct ArticleUpdateOutcome {
    /// The article as committed
    pub article: Article,
    /// How the hashtag associations changed
    pub hashtags: HashtagDiff,
    /// Orphan sweep over the previously associated hashtags
    pub sweep: SweepReport,
}

/// Manager for article lifecycle
pub struct ArticleService<S: BoardStorage> {
    /// Storage backend
    storage: Arc<S>,
    validator: ArticleValidator,
}

impl<S: BoardStorage> ArticleService<S> {
    /// Create a new article service with the given storage
    pub fn new(storage: S) -> Self {
        Self::with_storage(Arc::new(storage))
    }

    /// Create a new article service with shared storage
    pub fn with_storage(storage: Arc<S>) -> Self {
        Self {
            storage,
            validator: ArticleValidator::default(),
        }
    }

    /// Replace the default validator
    pub fn with_validator(mut self, validator: ArticleValidator) -> Self {
        self.validator = validator;
        self
    }

    /// Shared handle to the storage backend
    pub fn storage(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    fn reconciler(&self) -> HashtagReconciler<'_, S> {
        HashtagReconciler::new(self.storage.as_ref())
    }

    /// Create an article written by `actor`
    pub fn create(&self, actor: &UserId, draft: ArticleDraft) -> Result<Article> {
        self.validator.validate_title(&draft.title)?;
        self.validator.validate_content(&draft.content)?;
        if &draft.author.user_id != actor {
            return Err(BoardError::PermissionDenied {
                user_id: actor.clone(),
                resource: format!("articles of {}", draft.author.user_id),
            });
        }

        let hashtags = self.reconciler().reconcile(&draft.content)?;
        let article = self
            .storage
            .insert_article(draft, hashtags, AuditInfo::now(actor))?;

        info!(
            "Created article {} with hashtags {:?}",
            article.id,
            article.hashtag_names()
        );
        Ok(article)
    }

    /// Edit title and/or content of an article; only its author may do so
    pub fn update(
        &self,
        actor: &UserId,
        id: ArticleId,
        update: ArticleUpdate,
    ) -> Result<ArticleUpdateOutcome> {
        let mut article = self.storage.load_article(id)?;
        ensure_author(&article, actor)?;

        if let Some(title) = update.title {
            self.validator.validate_title(&title)?;
            article.title = title;
        }
        if let Some(content) = update.content {
            self.validator.validate_content(&content)?;
            article.content = content;
        }

        let content = article.content.clone();
        let mut diff = self
            .reconciler()
            .reconcile_update(&mut article.hashtags, &content)?;
        article.audit.touch(actor);

        let commit = self.storage.update_article(&article)?;
        // A concurrent edit may have committed associations we never loaded
        diff.candidate_orphans.extend(commit.replaced_hashtags);
        let article = commit.article;
        debug!(
            "Updated article {}: +{:?} -{:?}",
            id, diff.added, diff.removed
        );

        let sweep = self.reconciler().sweep_orphans(&diff.candidate_orphans);
        if !sweep.is_clean() {
            warn!(
                "Hashtag sweep after updating article {} left {} record(s) behind",
                id,
                sweep.failed.len()
            );
        }

        Ok(ArticleUpdateOutcome {
            article,
            hashtags: diff,
            sweep,
        })
    }

    /// Delete an article with its comments; only its author may do so
    pub fn delete(&self, actor: &UserId, id: ArticleId) -> Result<SweepReport> {
        let article = self.storage.load_article(id)?;
        ensure_author(&article, actor)?;

        let mut candidates = article.hashtag_ids();
        candidates.extend(self.storage.delete_article(id)?);
        info!("Deleted article {}", id);

        Ok(self.reconciler().sweep_orphans(&candidates))
    }

    /// Load an article by ID
    pub fn get(&self, id: ArticleId) -> Result<Article> {
        self.storage.load_article(id)
    }

    /// Load an article with its comment thread
    pub fn get_with_comments(&self, id: ArticleId) -> Result<ArticleWithComments> {
        let article = self.storage.load_article(id)?;
        let thread =
            CommentTreeBuilder::assemble(self.storage.list_comments_for_article(id)?);

        Ok(ArticleWithComments {
            article,
            comments: thread.roots,
            excluded_comments: thread.excluded.iter().map(ToString::to_string).collect(),
        })
    }

    /// All articles, newest first
    pub fn list(&self, request: PageRequest) -> Result<Page<Article>> {
        Ok(Page::slice(self.sorted_articles()?, request))
    }

    /// Articles matching `keyword` in the field chosen by `search_type`.
    ///
    /// A blank keyword lists everything.
    pub fn search(
        &self,
        search_type: SearchType,
        keyword: &str,
        request: PageRequest,
    ) -> Result<Page<Article>> {
        if keyword.trim().is_empty() {
            return self.list(request);
        }

        let Some(filter) = ArticleFilter::new(search_type, keyword) else {
            return Ok(Page::empty(request));
        };

        let matching = self
            .sorted_articles()?
            .into_iter()
            .filter(|article| filter.matches(article))
            .collect();
        Ok(Page::slice(matching, request))
    }

    /// Articles carrying the hashtag `name`; a blank name matches nothing
    pub fn search_by_hashtag(&self, name: &str, request: PageRequest) -> Result<Page<Article>> {
        let Some(name) = HashtagName::parse(name) else {
            return Ok(Page::empty(request));
        };

        let matching = self
            .sorted_articles()?
            .into_iter()
            .filter(|article| article.hashtags.iter().any(|record| record.name == name))
            .collect();
        Ok(Page::slice(matching, request))
    }

    /// Names of all stored hashtags, sorted
    pub fn hashtag_names(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self
            .storage
            .list_hashtags()?
            .into_iter()
            .map(|record| record.name.into_string())
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Number of stored articles
    pub fn count(&self) -> Result<usize> {
        self.storage.count_articles()
    }

    fn sorted_articles(&self) -> Result<Vec<Article>> {
        let mut articles = self.storage.list_articles()?;
        articles.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(articles)
    }
}

fn ensure_author(article: &Article, actor: &UserId) -> Result<()> {
    if article.is_written_by(actor) {
        Ok(())
    } else {
        Err(BoardError::PermissionDenied {
            user_id: actor.clone(),
            resource: format!("article {}", article.id),
        })
    }
}
