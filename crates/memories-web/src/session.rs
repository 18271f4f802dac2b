//! Browser session storage
//!
//! The bearer token and the signed-in account live in localStorage, the
//! only state the SPA persists across reloads.

use memories_types::AccountView;

const TOKEN_KEY: &str = "memories_token";
const USER_KEY: &str = "memories_user";

fn storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok()).flatten()
}

pub fn token() -> Option<String> {
    storage().and_then(|s| s.get_item(TOKEN_KEY).ok()).flatten()
}

pub fn current_user() -> Option<AccountView> {
    let raw = storage().and_then(|s| s.get_item(USER_KEY).ok()).flatten()?;
    serde_json::from_str(&raw).ok()
}

pub fn is_authenticated() -> bool {
    token().is_some()
}

pub fn store(token: &str, user: &AccountView) {
    if let Some(storage) = storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
    store_user(user);
}

pub fn store_user(user: &AccountView) {
    if let (Some(storage), Ok(raw)) = (storage(), serde_json::to_string(user)) {
        let _ = storage.set_item(USER_KEY, &raw);
    }
}

/// Drop the session. Called on logout and on credential invalidation.
pub fn clear() {
    if let Some(storage) = storage() {
        let _ = storage.remove_item(TOKEN_KEY);
        let _ = storage.remove_item(USER_KEY);
    }
}
