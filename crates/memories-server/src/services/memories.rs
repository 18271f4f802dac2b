//! Memory service
//!
//! Fetches the affected memory, runs the ownership/toggle/append rules,
//! persists the outcome, and resolves creator references for the response.

use crate::services::storage_err;
use crate::storage::{cache::memory_key, Database, EntityCache};
use chrono::Utc;
use memories_core::rules;
use memories_core::{CoreError, Result};
use memories_types::{
    Comment, CommentView, CreateMemoryRequest, CreatorRef, LikeResponse, Memory, MemoryPage,
    MemoryView, UpdateMemoryRequest, User,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

pub struct MemoryService {
    db: Arc<Database>,
    cache: Arc<EntityCache>,
}

impl MemoryService {
    pub fn new(db: Arc<Database>, cache: Arc<EntityCache>) -> Self {
        Self { db, cache }
    }

    pub async fn create(&self, creator_id: &str, req: &CreateMemoryRequest) -> Result<MemoryView> {
        if req.title.trim().is_empty() {
            return Err(CoreError::Validation("Title is required".to_string()));
        }
        if req.description.trim().is_empty() {
            return Err(CoreError::Validation("Description is required".to_string()));
        }

        let memory = Memory {
            id: uuid::Uuid::new_v4().to_string(),
            title: req.title.trim().to_string(),
            description: req.description.clone(),
            image: req.image.clone(),
            tags: rules::normalize_tags(&req.tags),
            likes: Vec::new(),
            comments: Vec::new(),
            creator_id: creator_id.to_string(),
            created_at: Utc::now(),
        };

        self.db.create_memory(&memory).await.map_err(storage_err)?;
        info!("Memory created: id={}, creator={}", memory.id, creator_id);

        self.cache.insert(memory_key(&memory.id), &memory);
        self.hydrate_one(memory).await
    }

    pub async fn get(&self, id: &str) -> Result<MemoryView> {
        if let Some(cached) = self.cache.get::<Memory>(&memory_key(id)) {
            debug!("Memory cache hit: {}", id);
            return self.hydrate_one(cached).await;
        }

        let memory = self.fetch_memory(id).await?;
        self.cache.insert(memory_key(id), &memory);
        self.hydrate_one(memory).await
    }

    pub async fn list(&self, page: u32, limit: u32, tag: Option<&str>) -> Result<MemoryPage> {
        let page = page.max(1);
        let limit = limit.clamp(1, 50);
        let offset = (page - 1) * limit;

        let memories = self
            .db
            .list_memories_page(limit, offset, tag)
            .await
            .map_err(storage_err)?;
        let total = self.db.count_memories(tag).await.map_err(storage_err)?;
        let total_pages = (total.div_ceil(limit as u64)) as u32;

        Ok(MemoryPage {
            memories: self.hydrate_many(memories).await?,
            current_page: page,
            total_pages,
            total_memories: total,
        })
    }

    pub async fn list_by_creator(&self, creator_id: &str) -> Result<Vec<MemoryView>> {
        let memories = self
            .db
            .list_memories_by_creator(creator_id)
            .await
            .map_err(storage_err)?;
        self.hydrate_many(memories).await
    }

    /// Creator-only. Missing request fields keep the stored values.
    pub async fn update(
        &self,
        requester_id: &str,
        id: &str,
        req: &UpdateMemoryRequest,
    ) -> Result<MemoryView> {
        let mut memory = self.fetch_memory(id).await?;
        rules::authorize_mutation(requester_id, &memory)?;

        if let Some(title) = &req.title {
            if title.trim().is_empty() {
                return Err(CoreError::Validation("Title is required".to_string()));
            }
            memory.title = title.trim().to_string();
        }
        if let Some(description) = &req.description {
            memory.description = description.clone();
        }
        if let Some(image) = &req.image {
            memory.image = Some(image.clone());
        }
        if let Some(tags) = &req.tags {
            memory.tags = rules::normalize_tags(tags);
        }

        self.db
            .update_memory_content(&memory)
            .await
            .map_err(storage_err)?;
        self.cache.insert(memory_key(id), &memory);

        self.hydrate_one(memory).await
    }

    /// Creator-only.
    pub async fn delete(&self, requester_id: &str, id: &str) -> Result<()> {
        let memory = self.fetch_memory(id).await?;
        rules::authorize_mutation(requester_id, &memory)?;

        self.db.delete_memory(id).await.map_err(storage_err)?;
        self.cache.invalidate(&memory_key(id));
        info!("Memory deleted: id={}, creator={}", id, requester_id);

        Ok(())
    }

    /// Any authenticated user may toggle; repeated calls alternate.
    pub async fn toggle_like(&self, requester_id: &str, id: &str) -> Result<LikeResponse> {
        let mut memory = self.fetch_memory(id).await?;

        let outcome = rules::toggle_like(&memory.likes, requester_id);
        self.db
            .set_memory_likes(id, &outcome.likes)
            .await
            .map_err(storage_err)?;

        memory.likes = outcome.likes.clone();
        self.cache.insert(memory_key(id), &memory);

        Ok(LikeResponse {
            likes: outcome.likes,
        })
    }

    /// Any authenticated user may comment; the new comment lands first.
    pub async fn add_comment(
        &self,
        requester_id: &str,
        id: &str,
        text: &str,
    ) -> Result<Vec<CommentView>> {
        let text = rules::validate_comment_text(text)?;
        let mut memory = self.fetch_memory(id).await?;

        let comment = Comment {
            id: uuid::Uuid::new_v4().to_string(),
            text,
            creator_id: requester_id.to_string(),
            created_at: Utc::now(),
        };
        let comments = rules::append_comment(&memory.comments, comment);

        self.db
            .set_memory_comments(id, &comments)
            .await
            .map_err(storage_err)?;

        memory.comments = comments.clone();
        self.cache.insert(memory_key(id), &memory);

        let author_ids: Vec<String> = comments.iter().map(|c| c.creator_id.clone()).collect();
        let creators = self.creators_for(&author_ids).await?;
        Ok(comments
            .into_iter()
            .map(|c| comment_view(c, &creators))
            .collect())
    }

    async fn fetch_memory(&self, id: &str) -> Result<Memory> {
        self.db
            .get_memory(id)
            .await
            .map_err(storage_err)?
            .ok_or_else(|| CoreError::NotFound("Memory".to_string()))
    }

    async fn hydrate_one(&self, memory: Memory) -> Result<MemoryView> {
        Ok(self.hydrate_many(vec![memory]).await?.remove(0))
    }

    /// Resolve creator references for a batch of memories in one store
    /// round trip.
    async fn hydrate_many(&self, memories: Vec<Memory>) -> Result<Vec<MemoryView>> {
        let mut ids: Vec<String> = Vec::new();
        for memory in &memories {
            ids.push(memory.creator_id.clone());
            ids.extend(memory.comments.iter().map(|c| c.creator_id.clone()));
        }
        let creators = self.creators_for(&ids).await?;

        Ok(memories
            .into_iter()
            .map(|memory| MemoryView {
                creator: resolve(&creators, &memory.creator_id),
                comments: memory
                    .comments
                    .into_iter()
                    .map(|c| comment_view(c, &creators))
                    .collect(),
                id: memory.id,
                title: memory.title,
                description: memory.description,
                image: memory.image,
                tags: memory.tags,
                likes: memory.likes,
                created_at: memory.created_at,
            })
            .collect())
    }

    async fn creators_for(&self, ids: &[String]) -> Result<HashMap<String, CreatorRef>> {
        let mut unique: Vec<String> = ids.to_vec();
        unique.sort();
        unique.dedup();

        let users: Vec<User> = self
            .db
            .get_users_by_ids(&unique)
            .await
            .map_err(storage_err)?;

        Ok(users
            .iter()
            .map(|user| (user.id.clone(), CreatorRef::from(user)))
            .collect())
    }
}

fn comment_view(comment: Comment, creators: &HashMap<String, CreatorRef>) -> CommentView {
    CommentView {
        creator: resolve(creators, &comment.creator_id),
        id: comment.id,
        text: comment.text,
        created_at: comment.created_at,
    }
}

// Users are never hard-deleted, so a miss here means a corrupt reference;
// render a placeholder rather than failing the whole read.
fn resolve(creators: &HashMap<String, CreatorRef>, id: &str) -> CreatorRef {
    creators.get(id).cloned().unwrap_or_else(|| CreatorRef {
        id: id.to_string(),
        username: "unknown".to_string(),
        profile_image: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn setup() -> (MemoryService, String) {
        let db = Arc::new(Database::in_memory().await.unwrap());
        let cache = Arc::new(EntityCache::new());

        let creator = User {
            id: "creator-1".to_string(),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            profile_image: String::new(),
            bio: String::new(),
            followers: vec![],
            following: vec![],
            created_at: Utc::now(),
        };
        db.create_user(&creator, "hash").await.unwrap();

        (MemoryService::new(db, cache), creator.id)
    }

    fn create_request(title: &str) -> CreateMemoryRequest {
        CreateMemoryRequest {
            title: title.to_string(),
            description: "A day at the shore".to_string(),
            image: None,
            tags: vec!["Travel".to_string(), " food ".to_string(), "FOOD".to_string()],
        }
    }

    #[tokio::test]
    async fn create_normalizes_tags_and_resolves_creator() {
        let (service, creator_id) = setup().await;

        let view = service
            .create(&creator_id, &create_request("Beach Day"))
            .await
            .unwrap();
        assert_eq!(view.tags, vec!["travel", "food", "food"]);
        assert_eq!(view.creator.username, "alice");
    }

    #[tokio::test]
    async fn only_the_creator_may_update_or_delete() {
        let (service, creator_id) = setup().await;
        let view = service
            .create(&creator_id, &create_request("Beach Day"))
            .await
            .unwrap();

        let update = UpdateMemoryRequest {
            title: Some("Renamed".to_string()),
            ..UpdateMemoryRequest::default()
        };
        let err = service
            .update("someone-else", &view.id, &update)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized));
        let err = service.delete("someone-else", &view.id).await.unwrap_err();
        assert!(matches!(err, CoreError::NotAuthorized));

        let updated = service.update(&creator_id, &view.id, &update).await.unwrap();
        assert_eq!(updated.title, "Renamed");
        // untouched fields keep their stored values
        assert_eq!(updated.description, "A day at the shore");

        service.delete(&creator_id, &view.id).await.unwrap();
        assert!(matches!(
            service.get(&view.id).await.unwrap_err(),
            CoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn like_toggle_alternates() {
        let (service, creator_id) = setup().await;
        let view = service
            .create(&creator_id, &create_request("Beach Day"))
            .await
            .unwrap();

        let liked = service.toggle_like("fan-1", &view.id).await.unwrap();
        assert_eq!(liked.likes, vec!["fan-1"]);

        let unliked = service.toggle_like("fan-1", &view.id).await.unwrap();
        assert!(unliked.likes.is_empty());
    }

    #[tokio::test]
    async fn comments_prepend_and_reject_empty_text() {
        let (service, creator_id) = setup().await;
        let view = service
            .create(&creator_id, &create_request("Beach Day"))
            .await
            .unwrap();

        assert!(matches!(
            service.add_comment(&creator_id, &view.id, "   ").await,
            Err(CoreError::EmptyComment)
        ));

        service
            .add_comment(&creator_id, &view.id, "first")
            .await
            .unwrap();
        let comments = service
            .add_comment(&creator_id, &view.id, "nice!")
            .await
            .unwrap();
        assert_eq!(comments.len(), 2);
        assert_eq!(comments[0].text, "nice!");
        assert_eq!(comments[0].creator.username, "alice");
    }

    #[tokio::test]
    async fn listing_pages_and_counts() {
        let (service, creator_id) = setup().await;
        for i in 0..3 {
            service
                .create(&creator_id, &create_request(&format!("Memory {i}")))
                .await
                .unwrap();
        }

        let page = service.list(1, 2, None).await.unwrap();
        assert_eq!(page.memories.len(), 2);
        assert_eq!(page.total_memories, 3);
        assert_eq!(page.total_pages, 2);

        let tagged = service.list(1, 10, Some("travel")).await.unwrap();
        assert_eq!(tagged.total_memories, 3);

        let missing = service.list(1, 10, Some("nosuchtag")).await.unwrap();
        assert_eq!(missing.total_memories, 0);
        assert!(missing.memories.is_empty());
    }
}
