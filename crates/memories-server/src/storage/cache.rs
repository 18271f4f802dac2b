//! In-memory entity cache using DashMap
//!
//! Fronts the content store for hot reads: single memory lookups and the
//! popular-users listing. Values are stored serialized so one cache serves
//! every entity type.

use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

pub struct EntityCache {
    data: Arc<DashMap<String, CacheEntry>>,
}

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl EntityCache {
    pub fn new() -> Self {
        let cache = Self {
            data: Arc::new(DashMap::new()),
        };
        cache.start_cleanup_task();
        cache
    }

    /// Fetch and decode a cached entity. Expired or undecodable entries
    /// behave as misses.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let entry = self.data.get(key)?;
        if let Some(expires) = entry.expires_at {
            if Instant::now() > expires {
                drop(entry);
                self.data.remove(key);
                return None;
            }
        }
        serde_json::from_slice(&entry.value).ok()
    }

    /// Cache an entity with no expiry; it lives until invalidated.
    pub fn insert<T: Serialize>(&self, key: String, value: &T) {
        if let Ok(bytes) = serde_json::to_vec(value) {
            self.data.insert(
                key,
                CacheEntry {
                    value: bytes,
                    expires_at: None,
                },
            );
        }
    }

    /// Cache an entity that goes stale on its own, like a ranking.
    pub fn insert_with_ttl<T: Serialize>(&self, key: String, value: &T, ttl: Duration) {
        if let Ok(bytes) = serde_json::to_vec(value) {
            self.data.insert(
                key,
                CacheEntry {
                    value: bytes,
                    expires_at: Some(Instant::now() + ttl),
                },
            );
        }
    }

    pub fn invalidate(&self, key: &str) {
        self.data.remove(key);
    }

    fn start_cleanup_task(&self) {
        let data = self.data.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;

                let now = Instant::now();
                let expired: Vec<String> = data
                    .iter()
                    .filter(|entry| {
                        entry
                            .expires_at
                            .map(|expires| now > expires)
                            .unwrap_or(false)
                    })
                    .map(|entry| entry.key().clone())
                    .collect();

                for key in expired {
                    data.remove(&key);
                }
            }
        });
    }
}

impl Default for EntityCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache key for a single memory.
pub fn memory_key(id: &str) -> String {
    format!("memory:{id}")
}

/// Cache key for the popular-users ranking.
pub const POPULAR_USERS_KEY: &str = "users:popular";

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_get_invalidate() {
        let cache = EntityCache::new();

        cache.insert("k".to_string(), &vec!["a".to_string()]);
        assert_eq!(
            cache.get::<Vec<String>>("k"),
            Some(vec!["a".to_string()])
        );

        assert_eq!(cache.get::<Vec<String>>("missing"), None);

        cache.invalidate("k");
        assert_eq!(cache.get::<Vec<String>>("k"), None);
    }

    #[tokio::test]
    async fn ttl_entries_expire() {
        let cache = EntityCache::new();

        cache.insert_with_ttl("k".to_string(), &1u32, Duration::from_millis(10));
        assert_eq!(cache.get::<u32>("k"), Some(1));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get::<u32>("k"), None);
    }
}
