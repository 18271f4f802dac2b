//! Client-side feed store
//!
//! The web client holds two cached views of memory state: the global feed
//! and the per-profile feed. After every successful mutation the server
//! returns the authoritative entity (or sub-collection), and the store
//! applies it to whichever caches reference that id, leaving ordering and
//! every other entry untouched. No full re-fetch is needed.

use memories_types::{CommentView, MemoryPage, MemoryView};

/// Sort modes for the feed listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Newest first by creation time.
    #[default]
    Latest,
    /// Oldest first by creation time.
    Oldest,
    /// Descending like count; ties keep their cached order.
    MostLiked,
}

/// Filter and sort settings applied over the currently cached page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedQuery {
    /// Case-insensitive substring match on title, description, or any tag.
    pub search: String,
    /// Exact single-tag filter.
    pub tag: Option<String>,
    pub sort: SortOrder,
}

impl FeedQuery {
    fn matches(&self, memory: &MemoryView) -> bool {
        let matches_search = if self.search.is_empty() {
            true
        } else {
            let needle = self.search.to_lowercase();
            memory.title.to_lowercase().contains(&needle)
                || memory.description.to_lowercase().contains(&needle)
                || memory.tags.iter().any(|tag| tag.contains(&needle))
        };

        let matches_tag = match &self.tag {
            Some(tag) => memory.tags.iter().any(|t| t == tag),
            None => true,
        };

        matches_search && matches_tag
    }
}

/// The two client caches plus the pagination state of the global feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedStore {
    /// Global feed cache, mirroring the paginated listing.
    pub memories: Vec<MemoryView>,
    /// Per-profile feed cache, populated by an explicit profile fetch.
    pub user_memories: Vec<MemoryView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub total_memories: u64,
}

impl FeedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a server page into the global cache. `append` is the
    /// "Load More" path: the new page goes after what is already cached.
    pub fn apply_page(&mut self, page: MemoryPage, append: bool) {
        if append {
            self.memories.extend(page.memories);
        } else {
            self.memories = page.memories;
        }
        self.current_page = page.current_page;
        self.total_pages = page.total_pages;
        self.total_memories = page.total_memories;
    }

    /// Replace the per-profile cache from an explicit fetch.
    pub fn set_user_memories(&mut self, memories: Vec<MemoryView>) {
        self.user_memories = memories;
    }

    pub fn has_more(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// A freshly created memory is prepended to the global cache only; the
    /// per-profile cache is refreshed by its own fetch.
    pub fn apply_created(&mut self, memory: MemoryView) {
        self.memories.insert(0, memory);
    }

    /// Replace the matching entry, by id, in both caches. Caches that do
    /// not reference the id are untouched.
    pub fn apply_updated(&mut self, memory: &MemoryView) {
        for cached in Self::entries_mut(&mut self.memories, &memory.id) {
            *cached = memory.clone();
        }
        for cached in Self::entries_mut(&mut self.user_memories, &memory.id) {
            *cached = memory.clone();
        }
    }

    /// Remove the matching entry, by id, from both caches.
    pub fn apply_deleted(&mut self, id: &str) {
        self.memories.retain(|m| m.id != id);
        self.user_memories.retain(|m| m.id != id);
    }

    /// Install an authoritative like set on the matching entry in both caches.
    pub fn apply_likes(&mut self, id: &str, likes: &[String]) {
        for cached in Self::entries_mut(&mut self.memories, id) {
            cached.likes = likes.to_vec();
        }
        for cached in Self::entries_mut(&mut self.user_memories, id) {
            cached.likes = likes.to_vec();
        }
    }

    /// Install an authoritative comment list on the matching entry in both caches.
    pub fn apply_comments(&mut self, id: &str, comments: &[CommentView]) {
        for cached in Self::entries_mut(&mut self.memories, id) {
            cached.comments = comments.to_vec();
        }
        for cached in Self::entries_mut(&mut self.user_memories, id) {
            cached.comments = comments.to_vec();
        }
    }

    /// Look up a cached memory by id, preferring the global cache.
    pub fn get(&self, id: &str) -> Option<&MemoryView> {
        self.memories
            .iter()
            .find(|m| m.id == id)
            .or_else(|| self.user_memories.iter().find(|m| m.id == id))
    }

    /// Sorted, de-duplicated tag list over the cached page. Drives the
    /// tag-filter control.
    pub fn visible_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .memories
            .iter()
            .flat_map(|m| m.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Filter and sort the cached global page. Computed over what is
    /// cached, not the full remote dataset.
    pub fn filtered(&self, query: &FeedQuery) -> Vec<MemoryView> {
        let mut result: Vec<MemoryView> = self
            .memories
            .iter()
            .filter(|m| query.matches(m))
            .cloned()
            .collect();

        match query.sort {
            SortOrder::Latest => result.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            SortOrder::Oldest => result.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            // sort_by is stable, so equal like counts keep cached order
            SortOrder::MostLiked => result.sort_by(|a, b| b.like_count().cmp(&a.like_count())),
        }

        result
    }

    fn entries_mut<'a>(
        cache: &'a mut [MemoryView],
        id: &'a str,
    ) -> impl Iterator<Item = &'a mut MemoryView> {
        cache.iter_mut().filter(move |m| m.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use memories_types::CreatorRef;

    fn view(id: &str, likes: usize, age_minutes: i64) -> MemoryView {
        MemoryView {
            id: id.to_string(),
            title: format!("Memory {id}"),
            description: "A day to remember".to_string(),
            image: None,
            tags: vec!["travel".to_string()],
            likes: (0..likes).map(|i| format!("liker-{i}")).collect(),
            comments: vec![],
            creator: CreatorRef {
                id: "creator".to_string(),
                username: "creator".to_string(),
                profile_image: String::new(),
            },
            created_at: Utc::now() - Duration::minutes(age_minutes),
        }
    }

    fn store_with(global: Vec<MemoryView>, profile: Vec<MemoryView>) -> FeedStore {
        FeedStore {
            memories: global,
            user_memories: profile,
            ..FeedStore::default()
        }
    }

    #[test]
    fn update_replaces_in_both_caches() {
        let mut store = store_with(
            vec![view("a", 0, 0), view("b", 0, 1)],
            vec![view("b", 0, 1)],
        );

        let mut updated = view("b", 0, 1);
        updated.title = "Renamed".to_string();
        store.apply_updated(&updated);

        assert_eq!(store.memories[1].title, "Renamed");
        assert_eq!(store.user_memories[0].title, "Renamed");
        // untouched entry and ordering preserved
        assert_eq!(store.memories[0].id, "a");
    }

    #[test]
    fn update_ignores_caches_without_the_id() {
        let mut store = store_with(vec![view("a", 0, 0)], vec![]);
        store.apply_updated(&view("zzz", 0, 0));
        assert_eq!(store.memories.len(), 1);
        assert!(store.user_memories.is_empty());
    }

    #[test]
    fn delete_removes_from_both_caches() {
        let mut store = store_with(
            vec![view("a", 0, 0), view("b", 0, 1)],
            vec![view("a", 0, 0)],
        );
        store.apply_deleted("a");
        assert_eq!(store.memories.len(), 1);
        assert_eq!(store.memories[0].id, "b");
        assert!(store.user_memories.is_empty());
    }

    #[test]
    fn create_prepends_to_global_cache_only() {
        let mut store = store_with(vec![view("a", 0, 0)], vec![view("a", 0, 0)]);
        store.apply_created(view("new", 0, 0));
        assert_eq!(store.memories[0].id, "new");
        assert_eq!(store.memories.len(), 2);
        // profile cache is refreshed by explicit fetch, not local insertion
        assert_eq!(store.user_memories.len(), 1);
    }

    #[test]
    fn likes_and_comments_touch_matching_entries() {
        let mut store = store_with(vec![view("a", 0, 0)], vec![view("a", 0, 0)]);
        store.apply_likes("a", &["u1".to_string(), "u2".to_string()]);
        assert_eq!(store.memories[0].likes.len(), 2);
        assert_eq!(store.user_memories[0].likes.len(), 2);
    }

    #[test]
    fn load_more_appends_the_next_page() {
        let mut store = FeedStore::new();
        store.apply_page(
            MemoryPage {
                memories: vec![view("a", 0, 0)],
                current_page: 1,
                total_pages: 2,
                total_memories: 2,
            },
            false,
        );
        assert!(store.has_more());

        store.apply_page(
            MemoryPage {
                memories: vec![view("b", 0, 1)],
                current_page: 2,
                total_pages: 2,
                total_memories: 2,
            },
            true,
        );
        assert_eq!(store.memories.len(), 2);
        assert!(!store.has_more());
    }

    #[test]
    fn most_liked_sorts_descending_with_stable_ties() {
        let store = store_with(
            vec![view("a", 3, 0), view("b", 1, 1), view("c", 2, 2)],
            vec![],
        );
        let sorted = store.filtered(&FeedQuery {
            sort: SortOrder::MostLiked,
            ..FeedQuery::default()
        });
        let ids: Vec<&str> = sorted.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
    }

    #[test]
    fn search_matches_title_description_and_tags() {
        let mut tagged = view("a", 0, 0);
        tagged.tags = vec!["sunset".to_string()];
        let store = store_with(vec![tagged, view("b", 0, 1)], vec![]);

        let by_tag = store.filtered(&FeedQuery {
            search: "SUN".to_string(),
            ..FeedQuery::default()
        });
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].id, "a");

        let by_title = store.filtered(&FeedQuery {
            search: "memory b".to_string(),
            ..FeedQuery::default()
        });
        assert_eq!(by_title.len(), 1);
        assert_eq!(by_title[0].id, "b");
    }

    #[test]
    fn tag_filter_is_exact() {
        let mut other = view("b", 0, 1);
        other.tags = vec!["food".to_string()];
        let store = store_with(vec![view("a", 0, 0), other], vec![]);

        let filtered = store.filtered(&FeedQuery {
            tag: Some("food".to_string()),
            ..FeedQuery::default()
        });
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "b");
    }

    #[test]
    fn visible_tags_are_sorted_and_unique() {
        let mut a = view("a", 0, 0);
        a.tags = vec!["travel".to_string(), "beach".to_string()];
        let mut b = view("b", 0, 1);
        b.tags = vec!["travel".to_string()];
        let store = store_with(vec![a, b], vec![]);

        assert_eq!(store.visible_tags(), vec!["beach", "travel"]);
    }
}
