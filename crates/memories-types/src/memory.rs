//! Memory and comment types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A comment as held in the content store. Owned by its parent memory,
/// append-only: comments are never individually edited or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}

/// A memory entry as held in the content store.
///
/// `creator_id` is immutable after creation and is the only identity
/// allowed to mutate or delete the entry. `tags` are stored normalized
/// (trimmed, lower-cased). `comments` are ordered newest-first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Memory {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    pub tags: Vec<String>,
    /// Ids of users who liked this memory; at most one entry per user.
    pub likes: Vec<String>,
    pub comments: Vec<Comment>,
    pub creator_id: String,
    pub created_at: DateTime<Utc>,
}
