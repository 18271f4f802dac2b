//! Feed page
//!
//! The global feed with search, tag filter, sort, and Load More. Filtering
//! and sorting run over the cached page in the shared feed store, not
//! against the server.

use memories_core::feed::{FeedQuery, SortOrder};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{ErrorBanner, Header, MemoryCard, PopularUsers};
use crate::state::{FeedAction, FeedHandle};
use crate::{api, session, Route};

const PAGE_SIZE: u32 = 10;

#[function_component(FeedPage)]
pub fn feed_page() -> Html {
    let feed = use_context::<FeedHandle>().expect("FeedPage rendered without feed context");
    let navigator = use_navigator().expect("FeedPage rendered outside a router");

    let query = use_state(FeedQuery::default);
    let loading = use_state(|| false);
    let error = use_state(|| None::<String>);
    let pending_like = use_state(|| None::<String>);

    let fetch_page = {
        let feed = feed.clone();
        let loading = loading.clone();
        let error = error.clone();
        Callback::from(move |(page, append): (u32, bool)| {
            if *loading {
                return;
            }
            loading.set(true);
            let feed = feed.clone();
            let loading = loading.clone();
            let error = error.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::list_memories(page, PAGE_SIZE, None).await {
                    Ok(page_data) => feed.dispatch(FeedAction::PageLoaded {
                        page: page_data,
                        append,
                    }),
                    Err(err) => error.set(Some(err.message)),
                }
                loading.set(false);
            });
        })
    };

    {
        let fetch_page = fetch_page.clone();
        use_effect_with((), move |_| {
            fetch_page.emit((1, false));
            || ()
        });
    }

    let on_search = {
        let query = query.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            let mut q = (*query).clone();
            q.search = input.value();
            query.set(q);
        })
    };

    let on_tag = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let value = select.value();
            let mut q = (*query).clone();
            q.tag = if value.is_empty() { None } else { Some(value) };
            query.set(q);
        })
    };

    let on_sort = {
        let query = query.clone();
        Callback::from(move |e: Event| {
            let select: HtmlSelectElement = e.target_unchecked_into();
            let mut q = (*query).clone();
            q.sort = match select.value().as_str() {
                "oldest" => SortOrder::Oldest,
                "popular" => SortOrder::MostLiked,
                _ => SortOrder::Latest,
            };
            query.set(q);
        })
    };

    let on_clear = {
        let query = query.clone();
        Callback::from(move |_| query.set(FeedQuery::default()))
    };

    let on_load_more = {
        let fetch_page = fetch_page.clone();
        let feed = feed.clone();
        Callback::from(move |_| {
            fetch_page.emit((feed.store.current_page + 1, true));
        })
    };

    let on_like = {
        let feed = feed.clone();
        let pending_like = pending_like.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |id: String| {
            if pending_like.is_some() {
                return;
            }
            pending_like.set(Some(id.clone()));

            let feed = feed.clone();
            let pending_like = pending_like.clone();
            let error = error.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::like_memory(&id).await {
                    Ok(response) => feed.dispatch(FeedAction::LikesApplied {
                        id,
                        likes: response.likes,
                    }),
                    Err(err) if err.is_unauthorized() => {
                        session::clear();
                        navigator.push(&Route::Login);
                    }
                    Err(err) => error.set(Some(err.message)),
                }
                pending_like.set(None);
            });
        })
    };

    let on_dismiss = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let visible = feed.store.filtered(&query);
    let tags = feed.store.visible_tags();
    let filters_active = !query.search.is_empty() || query.tag.is_some();

    html! {
        <div class="page">
            <Header />
            <main class="feed-layout">
                <section class="feed">
                    <h1>{ "Memories Feed" }</h1>

                    <div class="feed-controls">
                        <input
                            class="search"
                            type="text"
                            placeholder="Search memories..."
                            value={query.search.clone()}
                            oninput={on_search}
                        />
                        <select onchange={on_tag}>
                            <option value="" selected={query.tag.is_none()}>{ "All Tags" }</option>
                            { for tags.iter().map(|tag| html! {
                                <option
                                    value={tag.clone()}
                                    selected={query.tag.as_deref() == Some(tag.as_str())}
                                >
                                    { format!("#{tag}") }
                                </option>
                            }) }
                        </select>
                        <select onchange={on_sort}>
                            <option value="latest">{ "Latest" }</option>
                            <option value="oldest">{ "Oldest" }</option>
                            <option value="popular">{ "Most Liked" }</option>
                        </select>
                        if filters_active {
                            <button class="btn-link" onclick={on_clear}>{ "Clear" }</button>
                        }
                    </div>

                    if let Some(message) = (*error).clone() {
                        <ErrorBanner {message} on_dismiss={on_dismiss.clone()} />
                    }

                    if visible.is_empty() && !*loading {
                        <div class="empty-feed">
                            <h2>{ "No memories found" }</h2>
                            <p>
                                { if filters_active {
                                    "No memories match your search criteria."
                                } else {
                                    "Be the first to share your memories!"
                                } }
                            </p>
                        </div>
                    } else {
                        <>
                            <div class="memory-list">
                                { for visible.iter().map(|memory| {
                                    let like_pending =
                                        pending_like.as_deref() == Some(memory.id.as_str());
                                    html! {
                                        <MemoryCard
                                            key={memory.id.clone()}
                                            memory={memory.clone()}
                                            on_like={on_like.clone()}
                                            {like_pending}
                                        />
                                    }
                                }) }
                            </div>
                            if feed.store.has_more() && !filters_active {
                                <button
                                    class="btn-secondary"
                                    onclick={on_load_more}
                                    disabled={*loading}
                                >
                                    { if *loading { "Loading..." } else { "Load More" } }
                                </button>
                            }
                        </>
                    }
                </section>
                <PopularUsers />
            </main>
        </div>
    }
}
