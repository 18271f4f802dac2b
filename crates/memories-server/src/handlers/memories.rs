//! Memory handlers

use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use memories_types::{
    ApiMessage, CommentRequest, CommentView, CreateMemoryRequest, LikeResponse, MemoryPage,
    MemoryView, UpdateMemoryRequest,
};
use serde::Deserialize;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub tag: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<MemoryPage>> {
    let page = state
        .memory_service
        .list(
            params.page.unwrap_or(1),
            params.limit.unwrap_or(10),
            params.tag.as_deref(),
        )
        .await?;

    Ok(Json(page))
}

pub async fn get(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<MemoryView>> {
    let memory = state.memory_service.get(&id).await?;
    Ok(Json(memory))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateMemoryRequest>,
) -> ApiResult<(StatusCode, Json<MemoryView>)> {
    info!("Creating memory for: {}", auth.username);

    let memory = state.memory_service.create(&auth.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(memory)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(req): Json<UpdateMemoryRequest>,
) -> ApiResult<Json<MemoryView>> {
    let memory = state
        .memory_service
        .update(&auth.user_id, &id, &req)
        .await?;
    Ok(Json(memory))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Json<ApiMessage>> {
    state.memory_service.delete(&auth.user_id, &id).await?;
    Ok(Json(ApiMessage {
        message: "Memory deleted successfully".to_string(),
    }))
}

pub async fn like(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
) -> ApiResult<Json<LikeResponse>> {
    let likes = state.memory_service.toggle_like(&auth.user_id, &id).await?;
    Ok(Json(likes))
}

pub async fn comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    auth: AuthUser,
    Json(req): Json<CommentRequest>,
) -> ApiResult<Json<Vec<CommentView>>> {
    let comments = state
        .memory_service
        .add_comment(&auth.user_id, &id, &req.text)
        .await?;
    Ok(Json(comments))
}
