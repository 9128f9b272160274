//! Core type definitions for board-service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! numeric_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Get the raw numeric value
            pub fn value(&self) -> u64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok($name(s.trim().parse()?))
            }
        }
    };
}

numeric_id!(
    /// Unique identifier for an article, assigned by storage
    ArticleId
);

numeric_id!(
    /// Unique identifier for a comment, assigned by storage in creation order
    CommentId
);

numeric_id!(
    /// Unique identifier for a persisted hashtag record
    HashtagId
);

/// Login identifier of a board user
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Create a user id, rejecting blank values
    pub fn new(s: impl Into<String>) -> crate::Result<Self> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(crate::BoardError::Validation(
                "User ID cannot be empty".to_string(),
            ));
        }
        Ok(UserId(s))
    }

    /// Get the string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author of an article or comment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl Author {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            nickname: None,
        }
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = Some(nickname.into());
        self
    }

    /// Name shown next to content; blank nicknames fall back to the user id
    pub fn display_name(&self) -> &str {
        match &self.nickname {
            Some(nickname) if !nickname.trim().is_empty() => nickname,
            _ => self.user_id.as_str(),
        }
    }
}

/// Creation and modification stamps carried by articles and comments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditInfo {
    pub created_at: DateTime<Utc>,
    pub created_by: UserId,
    pub modified_at: DateTime<Utc>,
    pub modified_by: UserId,
}

impl AuditInfo {
    /// Stamp a new entity created by `actor` at `at`
    pub fn created(actor: &UserId, at: DateTime<Utc>) -> Self {
        Self {
            created_at: at,
            created_by: actor.clone(),
            modified_at: at,
            modified_by: actor.clone(),
        }
    }

    /// Stamp a new entity created by `actor` now
    pub fn now(actor: &UserId) -> Self {
        Self::created(actor, Utc::now())
    }

    /// Record a modification by `actor`
    pub fn touch(&mut self, actor: &UserId) {
        self.modified_at = Utc::now();
        self.modified_by = actor.clone();
    }
}
