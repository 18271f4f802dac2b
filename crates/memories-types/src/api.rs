//! API request/response contracts
//!
//! Every payload crossing the HTTP boundary is one of these typed records,
//! validated at the edge. Wire field names use camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::User;

/// Denormalized creator reference embedded in memory and comment views.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatorRef {
    pub id: String,
    pub username: String,
    pub profile_image: String,
}

impl From<&User> for CreatorRef {
    fn from(user: &User) -> Self {
        CreatorRef {
            id: user.id.clone(),
            username: user.username.clone(),
            profile_image: user.profile_image.clone(),
        }
    }
}

/// Comment as returned by the API, with its creator resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    pub id: String,
    pub text: String,
    pub creator: CreatorRef,
    pub created_at: DateTime<Utc>,
}

/// Memory as returned by the API, with creators resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryView {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub tags: Vec<String>,
    pub likes: Vec<String>,
    pub comments: Vec<CommentView>,
    pub creator: CreatorRef,
    pub created_at: DateTime<Utc>,
}

impl MemoryView {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }

    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likes.iter().any(|id| id == user_id)
    }
}

/// The requester's own account, as returned by login/register/me.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub profile_image: String,
    pub bio: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        AccountView {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            profile_image: user.profile_image.clone(),
            bio: user.bio.clone(),
        }
    }
}

/// Another user's profile. No email, no credential.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUserView {
    pub id: String,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
    pub followers: Vec<String>,
    pub following: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUserView {
    fn from(user: &User) -> Self {
        PublicUserView {
            id: user.id.clone(),
            username: user.username.clone(),
            profile_image: user.profile_image.clone(),
            bio: user.bio.clone(),
            followers: user.followers.clone(),
            following: user.following.clone(),
            created_at: user.created_at,
        }
    }
}

/// Popular-users ranking entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularUser {
    pub id: String,
    pub username: String,
    pub profile_image: String,
    pub bio: String,
    pub followers_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: AccountView,
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMemoryRequest {
    pub title: String,
    pub description: String,
    pub image: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Partial update; a missing field keeps the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateMemoryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub likes: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FollowResponse {
    pub following: Vec<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub bio: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub user: PublicUserView,
    pub memories: Vec<MemoryView>,
}

/// One server page of the global feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemoryPage {
    pub memories: Vec<MemoryView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_memories: u64,
}

/// Plain message body, used for deletions and errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}
