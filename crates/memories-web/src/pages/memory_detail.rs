//! Memory detail page
//!
//! Full view of one memory with like toggle, comments, and creator-only
//! edit/delete. Successful mutations are applied to the local view and
//! propagated to the shared feed store so any cached copies stay in sync.

use memories_types::MemoryView;
use web_sys::HtmlTextAreaElement;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{ErrorBanner, Header};
use crate::state::{FeedAction, FeedHandle};
use crate::{api, session, Route};

#[derive(Properties, PartialEq)]
pub struct MemoryDetailProps {
    pub id: String,
}

#[function_component(MemoryDetailPage)]
pub fn memory_detail_page(props: &MemoryDetailProps) -> Html {
    let feed = use_context::<FeedHandle>().expect("MemoryDetailPage rendered without feed context");
    let navigator = use_navigator().expect("MemoryDetailPage rendered outside a router");

    // Start from the cached copy when one exists; the fetch below replaces
    // it with the authoritative entity
    let memory = {
        let cached: Option<MemoryView> = feed.store.get(&props.id).cloned();
        use_state(|| cached)
    };
    let comment_text = use_state(String::new);
    let error = use_state(|| None::<String>);
    let busy = use_state(|| false);

    {
        let memory = memory.clone();
        let error = error.clone();
        use_effect_with(props.id.clone(), move |id| {
            let id = id.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::get_memory(&id).await {
                    Ok(view) => memory.set(Some(view)),
                    Err(err) => error.set(Some(err.message)),
                }
            });
            || ()
        });
    }

    let on_like = {
        let feed = feed.clone();
        let memory = memory.clone();
        let error = error.clone();
        let busy = busy.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let Some(current) = (*memory).clone() else {
                return;
            };
            if *busy {
                return;
            }
            busy.set(true);

            let feed = feed.clone();
            let memory = memory.clone();
            let error = error.clone();
            let busy = busy.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::like_memory(&current.id).await {
                    Ok(response) => {
                        let mut updated = current;
                        updated.likes = response.likes.clone();
                        let id = updated.id.clone();
                        memory.set(Some(updated));
                        feed.dispatch(FeedAction::LikesApplied {
                            id,
                            likes: response.likes,
                        });
                    }
                    Err(err) if err.is_unauthorized() => {
                        session::clear();
                        navigator.push(&Route::Login);
                    }
                    Err(err) => error.set(Some(err.message)),
                }
                busy.set(false);
            });
        })
    };

    let on_comment_input = {
        let comment_text = comment_text.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            comment_text.set(input.value());
        })
    };

    let on_comment_submit = {
        let feed = feed.clone();
        let memory = memory.clone();
        let comment_text = comment_text.clone();
        let error = error.clone();
        let busy = busy.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            let Some(current) = (*memory).clone() else {
                return;
            };
            if *busy {
                return;
            }
            busy.set(true);

            let feed = feed.clone();
            let memory = memory.clone();
            let comment_text = comment_text.clone();
            let error = error.clone();
            let busy = busy.clone();
            let text = (*comment_text).clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::comment_memory(&current.id, &text).await {
                    Ok(comments) => {
                        let mut updated = current;
                        updated.comments = comments.clone();
                        let id = updated.id.clone();
                        memory.set(Some(updated));
                        comment_text.set(String::new());
                        feed.dispatch(FeedAction::CommentsApplied { id, comments });
                    }
                    Err(err) => error.set(Some(err.message)),
                }
                busy.set(false);
            });
        })
    };

    let on_delete = {
        let feed = feed.clone();
        let memory = memory.clone();
        let error = error.clone();
        let busy = busy.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let Some(current) = (*memory).clone() else {
                return;
            };
            let confirmed = web_sys::window()
                .and_then(|w| w.confirm_with_message("Delete this memory?").ok())
                .unwrap_or(false);
            if !confirmed || *busy {
                return;
            }
            busy.set(true);

            let feed = feed.clone();
            let error = error.clone();
            let busy = busy.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::delete_memory(&current.id).await {
                    Ok(_) => {
                        feed.dispatch(FeedAction::Deleted(current.id.clone()));
                        navigator.push(&Route::Home);
                    }
                    Err(err) => {
                        error.set(Some(err.message));
                        busy.set(false);
                    }
                }
            });
        })
    };

    let on_dismiss = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let current_user = session::current_user();
    let authenticated = current_user.is_some();

    html! {
        <div class="page">
            <Header />
            <main class="memory-detail">
                if let Some(message) = (*error).clone() {
                    <ErrorBanner {message} on_dismiss={on_dismiss.clone()} />
                }

                if let Some(memory) = (*memory).clone() {
                    <article>
                        <div class="memory-card-creator">
                            <img class="avatar" src={memory.creator.profile_image.clone()} alt="" />
                            <Link<Route> to={Route::Profile { username: memory.creator.username.clone() }}>
                                { &memory.creator.username }
                            </Link<Route>>
                            <span class="date">
                                { memory.created_at.format("%b %e, %Y").to_string() }
                            </span>
                        </div>

                        <h1>{ &memory.title }</h1>

                        if let Some(image) = &memory.image {
                            <img class="memory-image" src={image.clone()} alt={memory.title.clone()} />
                        }

                        <p>{ &memory.description }</p>

                        <div class="tags">
                            { for memory.tags.iter().map(|tag| html! {
                                <span class="tag">{ format!("#{tag}") }</span>
                            }) }
                        </div>

                        <div class="memory-card-actions">
                            <button
                                class="btn-like"
                                onclick={on_like.clone()}
                                disabled={!authenticated || *busy}
                            >
                                { format!("♥ {}", memory.like_count()) }
                            </button>

                            if current_user.as_ref().map(|u| u.id.as_str())
                                == Some(memory.creator.id.as_str()) {
                                <Link<Route> to={Route::EditMemory { id: memory.id.clone() }}>
                                    { "Edit" }
                                </Link<Route>>
                                <button
                                    class="btn-danger"
                                    onclick={on_delete.clone()}
                                    disabled={*busy}
                                >
                                    { "Delete" }
                                </button>
                            }
                        </div>

                        <section class="comments">
                            <h2>{ format!("Comments ({})", memory.comments.len()) }</h2>

                            if authenticated {
                                <form onsubmit={on_comment_submit.clone()}>
                                    <textarea
                                        placeholder="Add a comment..."
                                        value={(*comment_text).clone()}
                                        oninput={on_comment_input.clone()}
                                        disabled={*busy}
                                    />
                                    <button type="submit" class="btn-primary" disabled={*busy}>
                                        { "Post" }
                                    </button>
                                </form>
                            }

                            <ul>
                                { for memory.comments.iter().map(|comment| html! {
                                    <li key={comment.id.clone()}>
                                        <img class="avatar" src={comment.creator.profile_image.clone()} alt="" />
                                        <div>
                                            <span class="author">{ &comment.creator.username }</span>
                                            <span class="date">
                                                { comment.created_at.format("%b %e, %Y").to_string() }
                                            </span>
                                            <p>{ &comment.text }</p>
                                        </div>
                                    </li>
                                }) }
                            </ul>
                        </section>
                    </article>
                } else {
                    <p class="empty">{ "Loading memory..." }</p>
                }
            </main>
        </div>
    }
}
