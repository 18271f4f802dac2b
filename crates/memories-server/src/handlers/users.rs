//! User handlers

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::AppState;
use axum::{
    extract::{Path, State},
    Json,
};
use memories_types::{
    AccountView, FollowResponse, PopularUser, ProfileResponse, UpdateProfileRequest,
};

pub async fn profile(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> ApiResult<Json<ProfileResponse>> {
    let user = state.social_service.get_profile(&username).await?;
    let memories = state.memory_service.list_by_creator(&user.id).await?;

    Ok(Json(ProfileResponse { user, memories }))
}

pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<AccountView>> {
    let account = state
        .social_service
        .update_profile(&auth.user_id, &req)
        .await?;
    Ok(Json(account))
}

pub async fn follow(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Json<FollowResponse>> {
    let response = state.social_service.toggle_follow(&auth.user_id, &id).await?;
    Ok(Json(response))
}

pub async fn popular(State(state): State<AppState>) -> ApiResult<Json<Vec<PopularUser>>> {
    let users = state.social_service.popular_users().await?;
    Ok(Json(users))
}
