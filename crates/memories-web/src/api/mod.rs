//! API client for the Memories server
//!
//! Thin XHR wrapper with typed request/response bodies. Every endpoint of
//! the REST surface has a wrapper here; pages never build requests by hand.

use futures::channel::oneshot;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{ProgressEvent, XmlHttpRequest};

use memories_types::{
    AccountView, ApiMessage, AuthResponse, CommentRequest, CommentView, CreateMemoryRequest,
    FollowResponse, LikeResponse, LoginRequest, MemoryPage, MemoryView, PopularUser,
    ProfileResponse, RegisterRequest, UpdateMemoryRequest, UpdateProfileRequest,
};

use crate::session;

/// A failed API call: HTTP status (0 for transport failures) and the
/// server-reported message.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

impl ApiError {
    fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
        }
    }

    /// Credential invalidation; callers drop the session and re-authenticate.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }
}

fn base_url() -> Result<String, ApiError> {
    let window = web_sys::window().ok_or_else(|| ApiError::transport("No window"))?;
    let location = window.location();
    let protocol = location
        .protocol()
        .map_err(|_| ApiError::transport("No protocol"))?;
    let host = location
        .host()
        .map_err(|_| ApiError::transport("No host"))?;
    Ok(format!("{protocol}//{host}/api"))
}

async fn send(
    method: &str,
    path: &str,
    body: Option<String>,
) -> Result<(u16, String), ApiError> {
    let url = format!("{}{}", base_url()?, path);

    let xhr = XmlHttpRequest::new().map_err(|e| ApiError::transport(format!("XHR error: {e:?}")))?;
    xhr.open(method, &url)
        .map_err(|e| ApiError::transport(format!("Open error: {e:?}")))?;

    if body.is_some() {
        xhr.set_request_header("Content-Type", "application/json")
            .map_err(|e| ApiError::transport(format!("Header error: {e:?}")))?;
    }
    if let Some(token) = session::token() {
        xhr.set_request_header("Authorization", &format!("Bearer {token}"))
            .map_err(|e| ApiError::transport(format!("Header error: {e:?}")))?;
    }

    let (sender, receiver) = oneshot::channel::<Result<XmlHttpRequest, String>>();
    let sender = Rc::new(RefCell::new(Some(sender)));

    let onload = {
        let sender = sender.clone();
        Closure::once_into_js(move |e: ProgressEvent| {
            if let Some(sender) = sender.borrow_mut().take() {
                let xhr: XmlHttpRequest = e.target().unwrap().dyn_into().unwrap();
                let _ = sender.send(Ok(xhr));
            }
        })
    };
    xhr.set_onload(Some(onload.as_ref().unchecked_ref()));

    let onerror = {
        let sender = sender.clone();
        Closure::once_into_js(move |_e: ProgressEvent| {
            if let Some(sender) = sender.borrow_mut().take() {
                let _ = sender.send(Err("Network error".to_string()));
            }
        })
    };
    xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));

    match body {
        Some(body) => xhr
            .send_with_opt_str(Some(&body))
            .map_err(|e| ApiError::transport(format!("Send error: {e:?}")))?,
        None => xhr
            .send()
            .map_err(|e| ApiError::transport(format!("Send error: {e:?}")))?,
    }

    let xhr = receiver
        .await
        .map_err(|_| ApiError::transport("Request dropped"))?
        .map_err(ApiError::transport)?;

    let status = xhr
        .status()
        .map_err(|e| ApiError::transport(format!("Status error: {e:?}")))?;
    let text = xhr
        .response_text()
        .map_err(|e| ApiError::transport(format!("Text error: {e:?}")))?
        .unwrap_or_default();

    Ok((status, text))
}

async fn request<T: DeserializeOwned>(
    method: &str,
    path: &str,
    body: Option<String>,
) -> Result<T, ApiError> {
    let (status, text) = send(method, path, body).await?;

    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiMessage>(&text)
            .map(|m| m.message)
            .unwrap_or_else(|_| format!("Request failed ({status})"));
        return Err(ApiError { status, message });
    }

    serde_json::from_str(&text)
        .map_err(|e| ApiError::transport(format!("Invalid response: {e}")))
}

fn json_body<B: Serialize>(body: &B) -> Result<Option<String>, ApiError> {
    serde_json::to_string(body)
        .map(Some)
        .map_err(|e| ApiError::transport(format!("Encode error: {e}")))
}

// Auth

pub async fn register(req: &RegisterRequest) -> Result<AuthResponse, ApiError> {
    request("POST", "/auth/register", json_body(req)?).await
}

pub async fn login(req: &LoginRequest) -> Result<AuthResponse, ApiError> {
    request("POST", "/auth/login", json_body(req)?).await
}

pub async fn me() -> Result<AccountView, ApiError> {
    request("GET", "/auth/me", None).await
}

// Memories

pub async fn list_memories(
    page: u32,
    limit: u32,
    tag: Option<&str>,
) -> Result<MemoryPage, ApiError> {
    let mut path = format!("/memories?page={page}&limit={limit}");
    if let Some(tag) = tag {
        let encoded: String = js_sys::encode_uri_component(tag).into();
        path.push_str(&format!("&tag={encoded}"));
    }
    request("GET", &path, None).await
}

pub async fn get_memory(id: &str) -> Result<MemoryView, ApiError> {
    request("GET", &format!("/memories/{id}"), None).await
}

pub async fn create_memory(req: &CreateMemoryRequest) -> Result<MemoryView, ApiError> {
    request("POST", "/memories", json_body(req)?).await
}

pub async fn update_memory(id: &str, req: &UpdateMemoryRequest) -> Result<MemoryView, ApiError> {
    request("PUT", &format!("/memories/{id}"), json_body(req)?).await
}

pub async fn delete_memory(id: &str) -> Result<ApiMessage, ApiError> {
    request("DELETE", &format!("/memories/{id}"), None).await
}

pub async fn like_memory(id: &str) -> Result<LikeResponse, ApiError> {
    request("PUT", &format!("/memories/{id}/like"), None).await
}

pub async fn comment_memory(id: &str, text: &str) -> Result<Vec<CommentView>, ApiError> {
    let req = CommentRequest {
        text: text.to_string(),
    };
    request("POST", &format!("/memories/{id}/comment"), json_body(&req)?).await
}

// Users

pub async fn get_profile(username: &str) -> Result<ProfileResponse, ApiError> {
    let encoded: String = js_sys::encode_uri_component(username).into();
    request("GET", &format!("/users/profile/{encoded}"), None).await
}

pub async fn update_profile(req: &UpdateProfileRequest) -> Result<AccountView, ApiError> {
    request("PUT", "/users/profile", json_body(req)?).await
}

pub async fn follow_user(id: &str) -> Result<FollowResponse, ApiError> {
    request("PUT", &format!("/users/follow/{id}"), None).await
}

pub async fn popular_users() -> Result<Vec<PopularUser>, ApiError> {
    request("GET", "/users/popular", None).await
}
