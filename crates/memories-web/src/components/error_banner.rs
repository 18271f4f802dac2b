//! Dismissable error banner
//!
//! Every reported error is transient: shown until dismissed, never fatal
//! to the session.

use yew::prelude::*;

#[derive(Properties, PartialEq)]
pub struct ErrorBannerProps {
    pub message: String,
    pub on_dismiss: Callback<MouseEvent>,
}

#[function_component(ErrorBanner)]
pub fn error_banner(props: &ErrorBannerProps) -> Html {
    html! {
        <div class="error-banner">
            <span>{ &props.message }</span>
            <button class="btn-link" onclick={props.on_dismiss.clone()}>{ "Dismiss" }</button>
        </div>
    }
}
