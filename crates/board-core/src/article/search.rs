//! Article search criteria

use super::model::Article;
use crate::error::{BoardError, Result};
use crate::hashtag::HashtagName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Field an article search matches against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchType {
    Title,
    Content,
    UserId,
    Nickname,
    Hashtag,
}

impl SearchType {
    pub const ALL: [SearchType; 5] = [
        SearchType::Title,
        SearchType::Content,
        SearchType::UserId,
        SearchType::Nickname,
        SearchType::Hashtag,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchType::Title => "title",
            SearchType::Content => "content",
            SearchType::UserId => "user_id",
            SearchType::Nickname => "nickname",
            SearchType::Hashtag => "hashtag",
        }
    }
}

impl fmt::Display for SearchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchType {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "title" => Ok(SearchType::Title),
            "content" => Ok(SearchType::Content),
            "user_id" | "id" | "user" => Ok(SearchType::UserId),
            "nickname" => Ok(SearchType::Nickname),
            "hashtag" | "tag" => Ok(SearchType::Hashtag),
            other => Err(BoardError::Validation(format!(
                "Unknown search type: {}",
                other
            ))),
        }
    }
}

/// Compiled keyword filter
#[derive(Debug, Clone)]
pub(crate) enum ArticleFilter {
    /// Case-insensitive substring on one field
    Text(SearchType, String),
    /// Any of these hashtags
    Hashtags(BTreeSet<HashtagName>),
}

impl ArticleFilter {
    /// `None` when the keyword cannot match anything
    pub(crate) fn new(search_type: SearchType, keyword: &str) -> Option<Self> {
        match search_type {
            SearchType::Hashtag => {
                let names: BTreeSet<HashtagName> = keyword
                    .split_whitespace()
                    .filter_map(HashtagName::parse)
                    .collect();
                (!names.is_empty()).then_some(ArticleFilter::Hashtags(names))
            }
            other => Some(ArticleFilter::Text(other, keyword.trim().to_lowercase())),
        }
    }

    pub(crate) fn matches(&self, article: &Article) -> bool {
        match self {
            ArticleFilter::Hashtags(names) => article
                .hashtags
                .iter()
                .any(|record| names.contains(&record.name)),
            ArticleFilter::Text(field, needle) => {
                let haystack = match field {
                    SearchType::Title => article.title.as_str(),
                    SearchType::Content => article.content.as_str(),
                    SearchType::UserId => article.author.user_id.as_str(),
                    SearchType::Nickname => match &article.author.nickname {
                        Some(nickname) => nickname.as_str(),
                        None => return false,
                    },
                    SearchType::Hashtag => return false,
                };
                haystack.to_lowercase().contains(needle.as_str())
            }
        }
    }
}
