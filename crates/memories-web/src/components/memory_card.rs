//! Memory card component

use memories_types::MemoryView;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::session;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct MemoryCardProps {
    pub memory: MemoryView,
    /// Emits the memory id; the owning page runs the request and applies
    /// the response to the shared store.
    pub on_like: Callback<String>,
    /// Disables the like button while its request is in flight.
    #[prop_or(false)]
    pub like_pending: bool,
}

#[function_component(MemoryCard)]
pub fn memory_card(props: &MemoryCardProps) -> Html {
    let memory = &props.memory;
    let authenticated = session::is_authenticated();
    let liked = session::current_user()
        .map(|user| memory.is_liked_by(&user.id))
        .unwrap_or(false);

    let on_like = {
        let on_like = props.on_like.clone();
        let id = memory.id.clone();
        Callback::from(move |_| on_like.emit(id.clone()))
    };

    html! {
        <article class="memory-card">
            <div class="memory-card-creator">
                <img class="avatar" src={memory.creator.profile_image.clone()} alt="" />
                <Link<Route> to={Route::Profile { username: memory.creator.username.clone() }}>
                    { &memory.creator.username }
                </Link<Route>>
                <span class="date">{ memory.created_at.format("%b %e, %Y").to_string() }</span>
            </div>

            if let Some(image) = &memory.image {
                <img class="memory-image" src={image.clone()} alt={memory.title.clone()} />
            }

            <div class="memory-card-body">
                <Link<Route> to={Route::MemoryDetail { id: memory.id.clone() }}>
                    <h3>{ &memory.title }</h3>
                </Link<Route>>
                <p>{ &memory.description }</p>
                <div class="tags">
                    { for memory.tags.iter().map(|tag| html! {
                        <span class="tag">{ format!("#{tag}") }</span>
                    }) }
                </div>
            </div>

            <div class="memory-card-actions">
                <button
                    class={classes!("btn-like", liked.then_some("liked"))}
                    onclick={on_like}
                    disabled={!authenticated || props.like_pending}
                >
                    { format!("♥ {}", memory.like_count()) }
                </button>
                <Link<Route> to={Route::MemoryDetail { id: memory.id.clone() }}>
                    { format!("{} comments", memory.comments.len()) }
                </Link<Route>>
            </div>
        </article>
    }
}
