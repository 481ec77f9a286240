use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;
use uuid::Uuid;

use super::{
    models::UserModel,
    types::{CreateUserRequest, UpdateUserRequest},
};
use crate::shared::{AppError, AppState};

/// GET /api/users
#[instrument(name = "list_users", skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserModel>>, AppError> {
    Ok(Json(state.user_service.list_users().await?))
}

/// GET /api/users/{user_id}
#[instrument(name = "get_user", skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserModel>, AppError> {
    Ok(Json(state.user_service.get_user(user_id).await?))
}

/// POST /api/users
#[instrument(name = "create_user", skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserModel>), AppError> {
    let user = state.user_service.create_user(request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// PUT /api/users/{user_id}
#[instrument(name = "update_user", skip(state))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(request): Json<UpdateUserRequest>,
) -> Result<Json<UserModel>, AppError> {
    Ok(Json(state.user_service.update_user(user_id, request).await?))
}

/// DELETE /api/users/{user_id}
#[instrument(name = "delete_user", skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.user_service.delete_user(user_id).await?;
    Ok(Json(json!({ "message": "User deleted" })))
}
