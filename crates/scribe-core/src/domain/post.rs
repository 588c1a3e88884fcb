use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::error::DomainError;

/// Title given to posts created without one.
pub const DEFAULT_POST_TITLE: &str = "Untitled";

/// Upper bound on title length, counted in characters.
pub const MAX_TITLE_CHARS: usize = 500;

/// Lifecycle state of a post. The only transition is `Draft -> Published`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

impl PostStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostStatus::Draft => "draft",
            PostStatus::Published => "published",
        }
    }
}

impl fmt::Display for PostStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PostStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            other => Err(DomainError::Validation(format!(
                "status must be one of: draft, published (got '{other}')"
            ))),
        }
    }
}

/// Post entity - a blog document.
///
/// `content_json` holds the editor's document tree and `content_html` the
/// client-rendered output. Both are stored exactly as received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content_json: Option<Value>,
    pub content_html: Option<String>,
    pub status: PostStatus,
    pub author_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new draft from creation input.
    pub fn new(input: NewPost) -> Self {
        let now = super::now();
        Self {
            id: Uuid::new_v4(),
            title: input
                .title
                .unwrap_or_else(|| DEFAULT_POST_TITLE.to_string()),
            content_json: input.content_json,
            content_html: input.content_html,
            status: PostStatus::Draft,
            author_id: input.author_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the fields present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: PostPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content_json) = patch.content_json {
            self.content_json = content_json;
        }
        if let Some(content_html) = patch.content_html {
            self.content_html = content_html;
        }
        self.touch();
    }

    /// Mark the post as published. Publishing twice is a no-op transition.
    pub fn publish(&mut self) {
        self.status = PostStatus::Published;
        self.touch();
    }

    /// Refresh `updated_at`, keeping it strictly increasing even when the
    /// clock has not advanced past the previous value.
    pub fn touch(&mut self) {
        let now = super::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            self.updated_at + TimeDelta::microseconds(1)
        };
    }
}

/// Input for creating a post. Every field is optional.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: Option<String>,
    pub content_json: Option<Value>,
    pub content_html: Option<String>,
    pub author_id: Option<Uuid>,
}

impl NewPost {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }
}

/// Partial update of a post.
///
/// The outer `Option` records presence: `None` leaves the field alone.
/// For nullable fields `Some(None)` clears the stored value.
#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content_json: Option<Option<Value>>,
    pub content_html: Option<Option<String>>,
}

impl PostPatch {
    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<(), DomainError> {
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(DomainError::Validation(format!(
            "title must be at most {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(())
}

/// Filter and window for listing posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQuery {
    pub status: Option<PostStatus>,
    pub offset: u64,
    pub limit: u64,
}

impl PostQuery {
    pub const DEFAULT_LIMIT: u64 = 50;

    /// Offset and limit capped to what a SQL `OFFSET`/`LIMIT` (signed 64-bit) accepts.
    pub fn bounded(self) -> Self {
        const SQL_MAX: u64 = i64::MAX as u64;
        Self {
            offset: self.offset.min(SQL_MAX),
            limit: self.limit.min(SQL_MAX),
            ..self
        }
    }
}

impl Default for PostQuery {
    fn default() -> Self {
        Self {
            status: None,
            offset: 0,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// One page of posts plus the size of the whole filtered set.
#[derive(Debug, Clone, Default)]
pub struct PostPage {
    pub posts: Vec<Post>,
    pub total: u64,
}
