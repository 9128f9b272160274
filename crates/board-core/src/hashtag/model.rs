//! Hashtag data models

use crate::types::HashtagId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Character that starts a hashtag in article text
pub const HASHTAG_MARKER: char = '#';

/// A normalized hashtag token, stored without the marker.
///
/// Normalization folds case with `str::to_lowercase` and strips leading
/// markers; nothing else is changed, so `#Rust` and `#rust` are the same tag
/// while `#rust,` is a different one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashtagName(String);

impl HashtagName {
    /// Normalize raw user input (`"#Java"`, `"java"`) into a name.
    ///
    /// Returns `None` when nothing remains after normalization or when the
    /// token would contain whitespace or another marker.
    pub fn parse(raw: &str) -> Option<Self> {
        let token = raw.trim().trim_start_matches(HASHTAG_MARKER);
        if token.is_empty() || token.chars().any(|c| c.is_whitespace() || c == HASHTAG_MARKER) {
            return None;
        }
        Some(HashtagName(token.to_lowercase()))
    }

    /// Wrap a token matched by the extractor
    pub(crate) fn from_token(token: &str) -> Self {
        HashtagName(token.to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for HashtagName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for HashtagName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A hashtag record shared between articles.
///
/// Equality, ordering and hashing look at the name only; a record that has
/// not been persisted yet (`id == None`) is the same hashtag as a stored
/// record with the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashtagRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<HashtagId>,
    pub name: HashtagName,
}

impl HashtagRecord {
    /// A record that storage has not assigned an id to yet
    pub fn unsaved(name: HashtagName) -> Self {
        Self { id: None, name }
    }

    pub fn persisted(id: HashtagId, name: HashtagName) -> Self {
        Self { id: Some(id), name }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

impl PartialEq for HashtagRecord {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for HashtagRecord {}

impl Hash for HashtagRecord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl PartialOrd for HashtagRecord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashtagRecord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(&other.name)
    }
}
