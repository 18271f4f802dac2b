//! Popular users sidebar

use memories_types::PopularUser;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::api;
use crate::Route;

#[function_component(PopularUsers)]
pub fn popular_users() -> Html {
    let users = use_state(Vec::<PopularUser>::new);

    {
        let users = users.clone();
        use_effect_with((), move |_| {
            wasm_bindgen_futures::spawn_local(async move {
                match api::popular_users().await {
                    Ok(list) => users.set(list),
                    Err(err) => log::debug!("Failed to load popular users: {}", err.message),
                }
            });
            || ()
        });
    }

    html! {
        <aside class="popular-users">
            <h2>{ "Popular" }</h2>
            if users.is_empty() {
                <p class="empty">{ "No users yet" }</p>
            } else {
                <ul>
                    { for users.iter().map(|user| html! {
                        <li key={user.id.clone()}>
                            <img class="avatar" src={user.profile_image.clone()} alt="" />
                            <Link<Route> to={Route::Profile { username: user.username.clone() }}>
                                { &user.username }
                            </Link<Route>>
                            <span class="followers">
                                { format!("{} followers", user.followers_count) }
                            </span>
                        </li>
                    }) }
                </ul>
            }
        </aside>
    }
}
