//! Post handlers

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::AppState;
use axum::{extract::State, Json};
use blog_core::PostPatch;
use blog_types::{
    CreatePostRequest, DeletePostRequest, GetAllPostsRequest, GetAllPostsResponse,
    GetPostRequest, GetPostResponse, IdResponse, UpdatePostRequest, Validate,
};
use tracing::info;

/// GET /posts
pub async fn get(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GetPostRequest>,
) -> Result<Json<GetPostResponse>, ApiError> {
    req.validate()?;

    let post = state.store.get_post(&req.id).await?;
    Ok(Json(GetPostResponse { post }))
}

/// GET /posts/all
pub async fn list(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GetAllPostsRequest>,
) -> Result<Json<GetAllPostsResponse>, ApiError> {
    req.validate()?;

    let posts = state.store.get_all_posts(&req.user_id).await?;
    Ok(Json(GetAllPostsResponse { posts }))
}

/// POST /posts
pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreatePostRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let id = state
        .store
        .create_post(&req.user_id, &req.title, &req.content)
        .await?;

    info!("Created post {} for user {}", id, req.user_id);
    Ok(Json(IdResponse::new(id)))
}

/// PUT /posts
pub async fn update(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdatePostRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let patch = PostPatch::from_wire(req.title, req.content);
    let id = state.store.update_post(&req.id, patch).await?;
    Ok(Json(IdResponse::new(id)))
}

/// DELETE /posts
pub async fn delete(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeletePostRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let id = state.store.delete_post(&req.id).await?;

    info!("Deleted post {}", id);
    Ok(Json(IdResponse::new(id)))
}
