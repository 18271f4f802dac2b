//! Memories Web Frontend
//!
//! A Yew-based single-page application for the Memories API. Holds the
//! shared feed store in a context so every page applies mutation responses
//! to the same cached views.

use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod components;
mod pages;
mod session;
mod state;

use components::ProtectedRoute;
use pages::{
    EditProfilePage, FeedPage, LoginPage, MemoryDetailPage, MemoryFormPage, ProfilePage,
};
use state::{FeedHandle, FeedState};

#[derive(Clone, Routable, PartialEq)]
enum Route {
    #[at("/")]
    Home,
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/create")]
    Create,
    #[at("/memory/:id")]
    MemoryDetail { id: String },
    #[at("/memory/:id/edit")]
    EditMemory { id: String },
    #[at("/profile/:username")]
    Profile { username: String },
    #[at("/settings")]
    EditProfile,
    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(routes: Route) -> Html {
    match routes {
        Route::Home => html! { <FeedPage /> },
        Route::Login => html! { <LoginPage register={false} /> },
        Route::Register => html! { <LoginPage register={true} /> },
        Route::Create => html! {
            <ProtectedRoute>
                <MemoryFormPage memory_id={None::<String>} />
            </ProtectedRoute>
        },
        Route::MemoryDetail { id } => html! { <MemoryDetailPage {id} /> },
        Route::EditMemory { id } => html! {
            <ProtectedRoute>
                <MemoryFormPage memory_id={Some(id)} />
            </ProtectedRoute>
        },
        Route::Profile { username } => html! { <ProfilePage {username} /> },
        Route::EditProfile => html! {
            <ProtectedRoute>
                <EditProfilePage />
            </ProtectedRoute>
        },
        Route::NotFound => html! { <h1>{ "404 - Not Found" }</h1> },
    }
}

#[function_component(App)]
fn app() -> Html {
    let feed = use_reducer(FeedState::default);

    // Opportunistic refresh of the stored identity. Failures degrade to a
    // logged-out state instead of surfacing.
    use_effect_with((), |_| {
        if session::token().is_some() {
            wasm_bindgen_futures::spawn_local(async {
                match api::me().await {
                    Ok(account) => session::store_user(&account),
                    Err(err) if err.is_unauthorized() => session::clear(),
                    Err(err) => log::debug!("Identity refresh failed: {}", err.message),
                }
            });
        }
        || ()
    });

    html! {
        <ContextProvider<FeedHandle> context={feed}>
            <BrowserRouter>
                <Switch<Route> render={switch} />
            </BrowserRouter>
        </ContextProvider<FeedHandle>>
    }
}

fn main() {
    wasm_logger::init(wasm_logger::Config::default());
    yew::Renderer::<App>::new().render();
}
