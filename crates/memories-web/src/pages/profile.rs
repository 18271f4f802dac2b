//! Profile page
//!
//! Another user's profile: bio, follower counts, follow/unfollow toggle,
//! and their memories. The memory list is the per-profile cache in the
//! shared feed store, refreshed here by an explicit fetch.

use memories_types::PublicUserView;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{ErrorBanner, Header, MemoryCard};
use crate::state::{FeedAction, FeedHandle};
use crate::{api, session, Route};

#[derive(Properties, PartialEq)]
pub struct ProfileProps {
    pub username: String,
}

#[function_component(ProfilePage)]
pub fn profile_page(props: &ProfileProps) -> Html {
    let feed = use_context::<FeedHandle>().expect("ProfilePage rendered without feed context");
    let navigator = use_navigator().expect("ProfilePage rendered outside a router");

    let profile = use_state(|| None::<PublicUserView>);
    let error = use_state(|| None::<String>);
    let pending = use_state(|| false);

    {
        let feed = feed.clone();
        let profile = profile.clone();
        let error = error.clone();
        use_effect_with(props.username.clone(), move |username| {
            let username = username.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::get_profile(&username).await {
                    Ok(response) => {
                        profile.set(Some(response.user));
                        feed.dispatch(FeedAction::UserMemoriesLoaded(response.memories));
                    }
                    Err(err) => error.set(Some(err.message)),
                }
            });
            || ()
        });
    }

    let on_follow = {
        let profile = profile.clone();
        let error = error.clone();
        let pending = pending.clone();
        let navigator = navigator.clone();
        Callback::from(move |_| {
            let Some(current) = (*profile).clone() else {
                return;
            };
            let Some(me) = session::current_user() else {
                navigator.push(&Route::Login);
                return;
            };
            if *pending {
                return;
            }
            pending.set(true);

            let profile = profile.clone();
            let error = error.clone();
            let pending = pending.clone();
            let navigator = navigator.clone();
            wasm_bindgen_futures::spawn_local(async move {
                match api::follow_user(&current.id).await {
                    Ok(response) => {
                        // The response carries our authoritative following
                        // set; mirror it onto the displayed follower list
                        let mut updated = current;
                        let followed = response.following.iter().any(|id| *id == updated.id);
                        updated.followers.retain(|id| *id != me.id);
                        if followed {
                            updated.followers.push(me.id.clone());
                        }
                        profile.set(Some(updated));
                    }
                    Err(err) if err.is_unauthorized() => {
                        session::clear();
                        navigator.push(&Route::Login);
                    }
                    Err(err) => error.set(Some(err.message)),
                }
                pending.set(false);
            });
        })
    };

    let on_like = {
        let feed = feed.clone();
        let error = error.clone();
        let navigator = navigator.clone();
        Callback::from(move |id: String| {
            let feed = feed.clone();
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
            });
        })
    };

    let on_dismiss = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    let me = session::current_user();

    html! {
        <div class="page">
            <Header />
            <main class="profile">
                if let Some(message) = (*error).clone() {
                    <ErrorBanner {message} on_dismiss={on_dismiss.clone()} />
                }

                if let Some(user) = (*profile).clone() {
                    <section class="profile-card">
                        <img class="avatar-large" src={user.profile_image.clone()} alt="" />
                        <h1>{ &user.username }</h1>
                        if !user.bio.is_empty() {
                            <p class="bio">{ &user.bio }</p>
                        }
                        <div class="profile-stats">
                            <span>{ format!("{} followers", user.followers.len()) }</span>
                            <span>{ format!("{} following", user.following.len()) }</span>
                        </div>

                        if let Some(me) = &me {
                            if me.id != user.id {
                                <button
                                    class="btn-primary"
                                    onclick={on_follow.clone()}
                                    disabled={*pending}
                                >
                                    { if user.followers.iter().any(|id| *id == me.id) {
                                        "Unfollow"
                                    } else {
                                        "Follow"
                                    } }
                                </button>
                            } else {
                                <Link<Route> classes="btn-secondary" to={Route::EditProfile}>
                                    { "Edit Profile" }
                                </Link<Route>>
                            }
                        }
                    </section>

                    <section class="profile-memories">
                        <h2>{ format!("Memories by {}", user.username) }</h2>
                        if feed.store.user_memories.is_empty() {
                            <p class="empty">{ "No memories yet" }</p>
                        } else {
                            <div class="memory-list">
                                { for feed.store.user_memories.iter().map(|memory| html! {
                                    <MemoryCard
                                        key={memory.id.clone()}
                                        memory={memory.clone()}
                                        on_like={on_like.clone()}
                                    />
                                }) }
                            </div>
                        }
                    </section>
                } else {
                    <p class="empty">{ "Loading profile..." }</p>
                }
            </main>
        </div>
    }
}
