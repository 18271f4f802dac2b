//! Social graph service
//!
//! Follow edges live on both endpoints' user records. SQLite cannot span
//! the two row updates in one transaction through this service seam, so
//! the pair is written side 1 then side 2 with a compensating reversal of
//! side 1 if side 2 fails.

use crate::services::storage_err;
use crate::storage::{cache::POPULAR_USERS_KEY, Database, EntityCache};
use memories_core::rules;
use memories_core::{CoreError, Result};
use memories_types::{
    AccountView, FollowResponse, PopularUser, PublicUserView, UpdateProfileRequest, User,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

const POPULAR_CACHE_TTL: Duration = Duration::from_secs(60);

pub struct SocialService {
    db: Arc<Database>,
    cache: Arc<EntityCache>,
}

impl SocialService {
    pub fn new(db: Arc<Database>, cache: Arc<EntityCache>) -> Self {
        Self { db, cache }
    }

    pub async fn get_profile(&self, username: &str) -> Result<PublicUserView> {
        let user = self
            .db
            .get_user_by_username(username)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("User".to_string()))?;

        Ok(PublicUserView::from(&user))
    }

    pub async fn get_account(&self, user_id: &str) -> Result<AccountView> {
        let user = self
            .db
            .get_user_by_id(user_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("User".to_string()))?;

        Ok(AccountView::from(&user))
    }

    /// Missing request fields keep the stored values.
    pub async fn update_profile(
        &self,
        user_id: &str,
        req: &UpdateProfileRequest,
    ) -> Result<AccountView> {
        let mut user = self
            .db
            .get_user_by_id(user_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("User".to_string()))?;

        if let Some(bio) = &req.bio {
            user.bio = bio.clone();
        }
        if let Some(profile_image) = &req.profile_image {
            user.profile_image = profile_image.clone();
        }

        self.db
            .update_user_profile(user_id, &user.bio, &user.profile_image)
            .await
            .map_err(storage_err)?;

        // Rankings embed profile fields
        self.cache.invalidate(POPULAR_USERS_KEY);

        Ok(AccountView::from(&user))
    }

    /// Flip the follow edge from `current_id` to `target_id`, persisting
    /// both sides.
    pub async fn toggle_follow(&self, current_id: &str, target_id: &str) -> Result<FollowResponse> {
        let target = self
            .db
            .get_user_by_id(target_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("User".to_string()))?;
        let current = self
            .db
            .get_user_by_id(current_id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("User".to_string()))?;

        let outcome = rules::toggle_follow(&current, &target)?;

        self.db
            .set_following(current_id, &outcome.following)
            .await
            .map_err(storage_err)?;

        if let Err(e) = self.db.set_followers(target_id, &outcome.followers).await {
            // Reverse side 1 so the edge is not left half-written
            match self.db.set_following(current_id, &current.following).await {
                Ok(()) => {
                    error!("Follow edge write failed, reversed: {}", e);
                    return Err(CoreError::Upstream(
                        "Could not update follow state".to_string(),
                    ));
                }
                Err(reversal) => {
                    error!(
                        "Follow edge left inconsistent: write failed ({}) and reversal failed ({})",
                        e, reversal
                    );
                    return Err(CoreError::Upstream(
                        "Follow state may be inconsistent".to_string(),
                    ));
                }
            }
        }

        self.cache.invalidate(POPULAR_USERS_KEY);
        info!(
            "User {} {} {}",
            current_id,
            if outcome.followed {
                "followed"
            } else {
                "unfollowed"
            },
            target_id
        );

        Ok(FollowResponse {
            following: outcome.following,
            message: if outcome.followed {
                "User followed".to_string()
            } else {
                "User unfollowed".to_string()
            },
        })
    }

    /// Top users by follower count; ties break on ascending id. Served
    /// from a short-lived cache.
    pub async fn popular_users(&self) -> Result<Vec<PopularUser>> {
        if let Some(cached) = self.cache.get::<Vec<PopularUser>>(POPULAR_USERS_KEY) {
            return Ok(cached);
        }

        let users: Vec<User> = self.db.list_users().await.map_err(storage_err)?;
        let ranked = rules::rank_popular(&users, rules::POPULAR_USER_LIMIT);

        self.cache
            .insert_with_ttl(POPULAR_USERS_KEY.to_string(), &ranked, POPULAR_CACHE_TTL);
        Ok(ranked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    async fn setup() -> SocialService {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let cache = Arc::new(EntityCache::new());

        for (id, username) in [("a", "alice"), ("b", "bob"), ("c", "carol")] {
            let user = User {
                id: id.to_string(),
                username: username.to_string(),
                email: format!("{username}@example.com"),
                profile_image: String::new(),
                bio: String::new(),
                followers: vec![],
                following: vec![],
                created_at: Utc::now(),
            };
            db.create_user(&user, "hash").await.unwrap();
        }

        SocialService::new(db, cache)
    }

    #[tokio::test]
    async fn follow_toggle_updates_both_records() {
        let service = setup().await;

        let followed = service.toggle_follow("a", "b").await.unwrap();
        assert_eq!(followed.following, vec!["b"]);
        assert_eq!(followed.message, "User followed");

        let a = service.db.get_user_by_id("a").await.unwrap().unwrap();
        let b = service.db.get_user_by_id("b").await.unwrap().unwrap();
        assert_eq!(a.following, vec!["b"]);
        assert_eq!(b.followers, vec!["a"]);

        let unfollowed = service.toggle_follow("a", "b").await.unwrap();
        assert!(unfollowed.following.is_empty());
        assert_eq!(unfollowed.message, "User unfollowed");

        let a = service.db.get_user_by_id("a").await.unwrap().unwrap();
        let b = service.db.get_user_by_id("b").await.unwrap().unwrap();
        assert!(a.following.is_empty());
        assert!(b.followers.is_empty());
    }

    #[tokio::test]
    async fn self_follow_mutates_nothing() {
        let service = setup().await;

        let err = service.toggle_follow("a", "a").await.unwrap_err();
        assert!(matches!(err, CoreError::SelfFollow));

        let a = service.db.get_user_by_id("a").await.unwrap().unwrap();
        assert!(a.following.is_empty());
        assert!(a.followers.is_empty());
    }

    #[tokio::test]
    async fn follow_unknown_target_is_not_found() {
        let service = setup().await;
        let err = service.toggle_follow("a", "nope").await.unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn popular_ranking_is_deterministic() {
        let service = setup().await;

        // b and c each follow a; c follows b
        service.toggle_follow("b", "a").await.unwrap();
        service.toggle_follow("c", "a").await.unwrap();
        service.toggle_follow("c", "b").await.unwrap();

        let ranked = service.popular_users().await.unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].username, "alice");
        assert_eq!(ranked[0].followers_count, 2);
        assert_eq!(ranked[1].username, "bob");
        // zero-follower tail still listed, id order
        assert_eq!(ranked[2].username, "carol");
    }

    #[tokio::test]
    async fn profile_update_keeps_missing_fields() {
        let service = setup().await;

        let updated = service
            .update_profile(
                "a",
                &UpdateProfileRequest {
                    bio: Some("hello".to_string()),
                    profile_image: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.bio, "hello");
        assert_eq!(updated.profile_image, "");
    }
}
