//! SQLite content store (embedded, no external dependencies)
//!
//! Two collections: `users` and `memories`. Set and sequence fields
//! (followers, following, tags, likes, comments) are stored as JSON text
//! columns and decoded at the edge of this module.

use anyhow::{Context, Result};
use memories_types::{Comment, Memory, User};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    pub async fn new(database_path: &str) -> Result<Self> {
        tracing::info!("Opening SQLite database at: {}", database_path);

        if let Some(parent) = std::path::Path::new(database_path).parent() {
            tokio::fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }

        let options = SqliteConnectOptions::new()
            .filename(database_path)
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| {
                format!("Failed to connect to SQLite database at: {}", database_path)
            })?;

        Self::run_migrations(&pool)
            .await
            .context("Failed to run database migrations")?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Private in-memory database, used by tests.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().filename(":memory:");

        // A single connection keeps the in-memory database alive
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .context("Failed to open in-memory SQLite database")?;

        Self::run_migrations(&pool).await?;

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    async fn run_migrations(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT UNIQUE NOT NULL,
                email TEXT UNIQUE NOT NULL,
                password_hash TEXT NOT NULL,
                profile_image TEXT NOT NULL DEFAULT '',
                bio TEXT NOT NULL DEFAULT '',
                followers TEXT NOT NULL DEFAULT '[]',
                following TEXT NOT NULL DEFAULT '[]',
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS memories (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                image TEXT,
                tags TEXT NOT NULL DEFAULT '[]',
                likes TEXT NOT NULL DEFAULT '[]',
                comments TEXT NOT NULL DEFAULT '[]',
                creator_id TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_memories_creator ON memories (creator_id)
            "#,
        )
        .execute(pool)
        .await?;

        Ok(())
    }

    // User operations

    pub async fn create_user(&self, user: &User, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, profile_image, bio,
                               followers, following, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(password_hash)
        .bind(&user.profile_image)
        .bind(&user.bio)
        .bind(serde_json::to_string(&user.followers)?)
        .bind(serde_json::to_string(&user.following)?)
        .bind(user.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, profile_image, bio, followers, following, created_at
            FROM users WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, profile_image, bio, followers, following, created_at
            FROM users WHERE username = ?1
            "#,
        )
        .bind(username)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, profile_image, bio, followers, following, created_at
            FROM users WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// Credential lookup for login: (user id, password hash).
    pub async fn get_auth_by_email(&self, email: &str) -> Result<Option<(String, String)>> {
        let row: Option<(String, String)> = sqlx::query_as(
            r#"
            SELECT id, password_hash FROM users WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row)
    }

    pub async fn get_users_by_ids(&self, ids: &[String]) -> Result<Vec<User>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: sqlx::QueryBuilder<sqlx::Sqlite> = sqlx::QueryBuilder::new(
            "SELECT id, username, email, profile_image, bio, followers, following, created_at \
             FROM users WHERE id IN (",
        );
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(id);
        }
        builder.push(")");

        let rows: Vec<UserRow> = builder.build_query_as().fetch_all(&*self.pool).await?;
        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, profile_image, bio, followers, following, created_at
            FROM users
            "#,
        )
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn update_user_profile(
        &self,
        id: &str,
        bio: &str,
        profile_image: &str,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET bio = ?1, profile_image = ?2 WHERE id = ?3
            "#,
        )
        .bind(bio)
        .bind(profile_image)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// One side of the follow edge; the service persists both sides as a pair.
    pub async fn set_following(&self, id: &str, following: &[String]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET following = ?1 WHERE id = ?2
            "#,
        )
        .bind(serde_json::to_string(following)?)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_followers(&self, id: &str, followers: &[String]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users SET followers = ?1 WHERE id = ?2
            "#,
        )
        .bind(serde_json::to_string(followers)?)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    // Memory operations

    pub async fn create_memory(&self, memory: &Memory) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO memories (id, title, description, image, tags, likes, comments,
                                  creator_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&memory.id)
        .bind(&memory.title)
        .bind(&memory.description)
        .bind(&memory.image)
        .bind(serde_json::to_string(&memory.tags)?)
        .bind(serde_json::to_string(&memory.likes)?)
        .bind(serde_json::to_string(&memory.comments)?)
        .bind(&memory.creator_id)
        .bind(memory.created_at)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_memory(&self, id: &str) -> Result<Option<Memory>> {
        let row: Option<MemoryRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, image, tags, likes, comments, creator_id, created_at
            FROM memories WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&*self.pool)
        .await?;

        Ok(row.map(|r| r.into()))
    }

    /// Content fields only; likes and comments have their own updates.
    pub async fn update_memory_content(&self, memory: &Memory) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE memories SET title = ?1, description = ?2, image = ?3, tags = ?4
            WHERE id = ?5
            "#,
        )
        .bind(&memory.title)
        .bind(&memory.description)
        .bind(&memory.image)
        .bind(serde_json::to_string(&memory.tags)?)
        .bind(&memory.id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// Single-column write: atomic at the granularity of one document, no
    /// optimistic-concurrency guard (last write wins).
    pub async fn set_memory_likes(&self, id: &str, likes: &[String]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE memories SET likes = ?1 WHERE id = ?2
            "#,
        )
        .bind(serde_json::to_string(likes)?)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn set_memory_comments(&self, id: &str, comments: &[Comment]) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE memories SET comments = ?1 WHERE id = ?2
            "#,
        )
        .bind(serde_json::to_string(comments)?)
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    pub async fn delete_memory(&self, id: &str) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM memories WHERE id = ?1
            "#,
        )
        .bind(id)
        .execute(&*self.pool)
        .await?;

        Ok(())
    }

    /// One page of the global feed, newest first, optionally filtered to
    /// memories carrying the given tag.
    pub async fn list_memories_page(
        &self,
        limit: u32,
        offset: u32,
        tag: Option<&str>,
    ) -> Result<Vec<Memory>> {
        let rows: Vec<MemoryRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, image, tags, likes, comments, creator_id, created_at
            FROM memories
            WHERE ?1 IS NULL
               OR EXISTS (SELECT 1 FROM json_each(memories.tags) WHERE json_each.value = ?1)
            ORDER BY created_at DESC
            LIMIT ?2 OFFSET ?3
            "#,
        )
        .bind(tag)
        .bind(limit)
        .bind(offset)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    pub async fn count_memories(&self, tag: Option<&str>) -> Result<u64> {
        let (count,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM memories
            WHERE ?1 IS NULL
               OR EXISTS (SELECT 1 FROM json_each(memories.tags) WHERE json_each.value = ?1)
            "#,
        )
        .bind(tag)
        .fetch_one(&*self.pool)
        .await?;

        Ok(count as u64)
    }

    pub async fn list_memories_by_creator(&self, creator_id: &str) -> Result<Vec<Memory>> {
        let rows: Vec<MemoryRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, image, tags, likes, comments, creator_id, created_at
            FROM memories WHERE creator_id = ?1
            ORDER BY created_at DESC
            "#,
        )
        .bind(creator_id)
        .fetch_all(&*self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }
}

// Helper structs for sqlx query_as

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    profile_image: String,
    bio: String,
    followers: String,
    following: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(r: UserRow) -> Self {
        User {
            id: r.id,
            username: r.username,
            email: r.email,
            profile_image: r.profile_image,
            bio: r.bio,
            followers: serde_json::from_str(&r.followers).unwrap_or_default(),
            following: serde_json::from_str(&r.following).unwrap_or_default(),
            created_at: r.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct MemoryRow {
    id: String,
    title: String,
    description: String,
    image: Option<String>,
    tags: String,
    likes: String,
    comments: String,
    creator_id: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MemoryRow> for Memory {
    fn from(r: MemoryRow) -> Self {
        Memory {
            id: r.id,
            title: r.title,
            description: r.description,
            image: r.image,
            tags: serde_json::from_str(&r.tags).unwrap_or_default(),
            likes: serde_json::from_str(&r.likes).unwrap_or_default(),
            comments: serde_json::from_str(&r.comments).unwrap_or_default(),
            creator_id: r.creator_id,
            created_at: r.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            profile_image: String::new(),
            bio: String::new(),
            followers: vec![],
            following: vec![],
            created_at: Utc::now(),
        }
    }

    fn test_memory(id: &str, creator_id: &str, tags: &[&str]) -> Memory {
        Memory {
            id: id.to_string(),
            title: format!("Memory {id}"),
            description: "Worth keeping".to_string(),
            image: None,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            likes: vec![],
            comments: vec![],
            creator_id: creator_id.to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn user_round_trip() {
        let db = Database::in_memory().await.unwrap();
        let user = test_user("u1", "alice");
        db.create_user(&user, "hash").await.unwrap();

        let by_id = db.get_user_by_id("u1").await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");
        let by_name = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, "u1");
        let auth = db.get_auth_by_email("alice@example.com").await.unwrap();
        assert_eq!(auth, Some(("u1".to_string(), "hash".to_string())));
    }

    #[tokio::test]
    async fn duplicate_username_is_a_constraint_violation() {
        let db = Database::in_memory().await.unwrap();
        db.create_user(&test_user("u1", "alice"), "hash")
            .await
            .unwrap();

        let mut dup = test_user("u2", "alice");
        dup.email = "other@example.com".to_string();
        assert!(db.create_user(&dup, "hash").await.is_err());
    }

    #[tokio::test]
    async fn follow_sides_persist_independently() {
        let db = Database::in_memory().await.unwrap();
        db.create_user(&test_user("a", "alice"), "h").await.unwrap();
        db.create_user(&test_user("b", "bob"), "h").await.unwrap();

        db.set_following("a", &["b".to_string()]).await.unwrap();
        db.set_followers("b", &["a".to_string()]).await.unwrap();

        let a = db.get_user_by_id("a").await.unwrap().unwrap();
        let b = db.get_user_by_id("b").await.unwrap().unwrap();
        assert_eq!(a.following, vec!["b"]);
        assert_eq!(b.followers, vec!["a"]);
    }

    #[tokio::test]
    async fn memory_page_and_tag_filter() {
        let db = Database::in_memory().await.unwrap();
        db.create_memory(&test_memory("m1", "u1", &["travel"]))
            .await
            .unwrap();
        db.create_memory(&test_memory("m2", "u1", &["food"]))
            .await
            .unwrap();

        let all = db.list_memories_page(10, 0, None).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(db.count_memories(None).await.unwrap(), 2);

        let tagged = db.list_memories_page(10, 0, Some("food")).await.unwrap();
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].id, "m2");
        assert_eq!(db.count_memories(Some("food")).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn memory_sub_collections_update() {
        let db = Database::in_memory().await.unwrap();
        db.create_memory(&test_memory("m1", "u1", &[]))
            .await
            .unwrap();

        db.set_memory_likes("m1", &["u2".to_string()]).await.unwrap();
        let comment = Comment {
            id: "c1".to_string(),
            text: "nice!".to_string(),
            creator_id: "u2".to_string(),
            created_at: Utc::now(),
        };
        db.set_memory_comments("m1", &[comment]).await.unwrap();

        let stored = db.get_memory("m1").await.unwrap().unwrap();
        assert_eq!(stored.likes, vec!["u2"]);
        assert_eq!(stored.comments.len(), 1);
        assert_eq!(stored.comments[0].text, "nice!");
    }
}
