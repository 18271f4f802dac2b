//! Edit profile page

use memories_types::UpdateProfileRequest;
use web_sys::{HtmlInputElement, HtmlTextAreaElement};
use yew::prelude::*;
use yew_router::prelude::*;

use crate::components::{ErrorBanner, Header};
use crate::{api, session, Route};

#[function_component(EditProfilePage)]
pub fn edit_profile_page() -> Html {
    let navigator = use_navigator().expect("EditProfilePage rendered outside a router");

    let account = session::current_user();
    let bio = use_state(|| account.as_ref().map(|a| a.bio.clone()).unwrap_or_default());
    let profile_image = use_state(|| {
        account
            .as_ref()
            .map(|a| a.profile_image.clone())
            .unwrap_or_default()
    });
    let error = use_state(|| None::<String>);
    let saving = use_state(|| false);

    let on_bio = {
        let bio = bio.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlTextAreaElement = e.target_unchecked_into();
            bio.set(input.value());
        })
    };
    let on_image = {
        let profile_image = profile_image.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            profile_image.set(input.value());
        })
    };

    let on_submit = {
        let navigator = navigator.clone();
        let bio = bio.clone();
        let profile_image = profile_image.clone();
        let error = error.clone();
        let saving = saving.clone();
        Callback::from(move |e: SubmitEvent| {
            e.prevent_default();
            if *saving {
                return;
            }
            saving.set(true);

            let navigator = navigator.clone();
            let error = error.clone();
            let saving = saving.clone();
            let req = UpdateProfileRequest {
                bio: Some((*bio).clone()),
                profile_image: Some((*profile_image).clone()),
            };
            wasm_bindgen_futures::spawn_local(async move {
                match api::update_profile(&req).await {
                    Ok(account) => {
                        session::store_user(&account);
                        navigator.push(&Route::Profile {
                            username: account.username,
                        });
                    }
                    Err(err) if err.is_unauthorized() => {
                        session::clear();
                        navigator.push(&Route::Login);
                    }
                    Err(err) => {
                        error.set(Some(err.message));
                        saving.set(false);
                    }
                }
            });
        })
    };

    let on_dismiss = {
        let error = error.clone();
        Callback::from(move |_| error.set(None))
    };

    html! {
        <div class="page">
            <Header />
            <main class="memory-form">
                <h1>{ "Edit Profile" }</h1>

                if let Some(message) = (*error).clone() {
                    <ErrorBanner {message} on_dismiss={on_dismiss.clone()} />
                }

                <form onsubmit={on_submit}>
                    <div class="form-group">
                        <label>{ "Bio" }</label>
                        <textarea
                            placeholder="Tell people about yourself"
                            value={(*bio).clone()}
                            oninput={on_bio}
                            disabled={*saving}
                        />
                    </div>

                    <div class="form-group">
                        <label>{ "Profile image URL" }</label>
                        <input
                            type="url"
                            placeholder="https://..."
                            value={(*profile_image).clone()}
                            oninput={on_image}
                            disabled={*saving}
                        />
                    </div>

                    <button type="submit" class="btn-primary" disabled={*saving}>
                        { if *saving { "Saving..." } else { "Save Profile" } }
                    </button>
                </form>
            </main>
        </div>
    }
}
