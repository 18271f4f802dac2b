//! Shared feed state
//!
//! One [`FeedStore`] lives at the application root. Every page dispatches
//! mutation responses here so both cached views (global feed, per-profile
//! feed) stay consistent without re-fetching.

use memories_core::feed::FeedStore;
use memories_types::{CommentView, MemoryPage, MemoryView};
use std::rc::Rc;
use yew::prelude::*;

pub type FeedHandle = UseReducerHandle<FeedState>;

#[derive(Clone, Default, PartialEq)]
pub struct FeedState {
    pub store: FeedStore,
}

pub enum FeedAction {
    PageLoaded { page: MemoryPage, append: bool },
    UserMemoriesLoaded(Vec<MemoryView>),
    Created(MemoryView),
    Updated(MemoryView),
    Deleted(String),
    LikesApplied { id: String, likes: Vec<String> },
    CommentsApplied { id: String, comments: Vec<CommentView> },
}

impl Reducible for FeedState {
    type Action = FeedAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut store = self.store.clone();
        match action {
            FeedAction::PageLoaded { page, append } => store.apply_page(page, append),
            FeedAction::UserMemoriesLoaded(memories) => store.set_user_memories(memories),
            FeedAction::Created(memory) => store.apply_created(memory),
            FeedAction::Updated(memory) => store.apply_updated(&memory),
            FeedAction::Deleted(id) => store.apply_deleted(&id),
            FeedAction::LikesApplied { id, likes } => store.apply_likes(&id, &likes),
            FeedAction::CommentsApplied { id, comments } => store.apply_comments(&id, &comments),
        }
        Rc::new(FeedState { store })
    }
}
