//! Protected Route Component
//!
//! Ensures only authenticated users can access certain routes

use yew::prelude::*;
use yew_router::prelude::*;

use crate::session;
use crate::Route;

#[derive(Properties, PartialEq)]
pub struct ProtectedRouteProps {
    pub children: Html,
}

/// Redirects to the login page if no session is stored.
#[function_component(ProtectedRoute)]
pub fn protected_route(props: &ProtectedRouteProps) -> Html {
    if session::is_authenticated() {
        props.children.clone()
    } else {
        html! {
            <Redirect<Route> to={Route::Login} />
        }
    }
}
