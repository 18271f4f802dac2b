//! Top navigation bar

use yew::prelude::*;
use yew_router::prelude::*;

use crate::session;
use crate::Route;

#[function_component(Header)]
pub fn header() -> Html {
    let navigator = use_navigator().expect("Header rendered outside a router");
    let user = session::current_user();

    let on_logout = {
        let navigator = navigator.clone();
        Callback::from(move |_| {
            session::clear();
            navigator.push(&Route::Login);
        })
    };

    html! {
        <header class="app-header">
            <Link<Route> classes="brand" to={Route::Home}>{ "Memories" }</Link<Route>>
            <nav>
                if let Some(user) = user {
                    <Link<Route> to={Route::Create}>{ "Create" }</Link<Route>>
                    <Link<Route> to={Route::Profile { username: user.username.clone() }}>
                        { user.username.clone() }
                    </Link<Route>>
                    <Link<Route> to={Route::EditProfile}>{ "Settings" }</Link<Route>>
                    <button class="btn-link" onclick={on_logout}>{ "Log out" }</button>
                } else {
                    <Link<Route> to={Route::Login}>{ "Sign In" }</Link<Route>>
                    <Link<Route> to={Route::Register}>{ "Create Account" }</Link<Route>>
                }
            </nav>
        </header>
    }
}
