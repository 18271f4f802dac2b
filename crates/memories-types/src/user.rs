//! User types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// User account as held in the content store.
///
/// The password credential never appears here; it stays inside the server's
/// storage layer and is only consulted during login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub bio: String,
    /// Ids of users following this user.
    pub followers: Vec<String>,
    /// Ids of users this user follows.
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn follower_count(&self) -> usize {
        self.followers.len()
    }

    pub fn is_following(&self, user_id: &str) -> bool {
        self.following.iter().any(|id| id == user_id)
    }
}
