//! Authentication handlers

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use memories_types::{AccountView, AuthResponse, LoginRequest, RegisterRequest};
use tracing::info;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    info!("Registration attempt for: {}", req.username);

    let (user, token) = state.auth_service.register(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: AccountView::from(&user),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    info!("Login attempt for: {}", req.email);

    let (user, token) = state.auth_service.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        user: AccountView::from(&user),
        token,
    }))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<AccountView>> {
    let account = state.social_service.get_account(&auth.user_id).await?;
    Ok(Json(account))
}
