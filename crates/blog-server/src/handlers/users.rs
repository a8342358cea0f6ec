//! User handlers

use crate::error::ApiError;
use crate::extractors::JsonBody;
use crate::AppState;
use axum::{extract::State, Json};
use blog_core::UserPatch;
use blog_types::{
    CreateUserRequest, DeleteUserRequest, GetUserRequest, GetUserResponse, IdResponse,
    UpdateUserRequest, Validate,
};
use tracing::info;

/// GET /users
pub async fn get(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<GetUserRequest>,
) -> Result<Json<GetUserResponse>, ApiError> {
    req.validate()?;

    let user = state.store.get_user(&req.id).await?;
    Ok(Json(GetUserResponse { user }))
}

/// POST /users
pub async fn create(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<CreateUserRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let name = Some(req.name.as_str()).filter(|name| !name.is_empty());
    let id = state.store.create_user(name, &req.email).await?;

    info!("Created user {}", id);
    Ok(Json(IdResponse::new(id)))
}

/// PUT /users
pub async fn update(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<UpdateUserRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let patch = UserPatch::from_wire(req.name, req.email);
    let id = state.store.update_user(&req.id, patch).await?;
    Ok(Json(IdResponse::new(id)))
}

/// DELETE /users
pub async fn delete(
    State(state): State<AppState>,
    JsonBody(req): JsonBody<DeleteUserRequest>,
) -> Result<Json<IdResponse>, ApiError> {
    req.validate()?;

    let id = state.store.delete_user(&req.id).await?;

    info!("Deleted user {}", id);
    Ok(Json(IdResponse::new(id)))
}
