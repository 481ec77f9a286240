use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::instrument;

use super::{
    models::TaskModel,
    types::{CreateTaskRequest, UpdateTaskRequest},
};
use crate::shared::{AppError, AppState};

/// GET /api/tasks
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<TaskModel>>, AppError> {
    Ok(Json(state.task_service.list_tasks().await?))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TaskModel>, AppError> {
    Ok(Json(state.task_service.get_task(id).await?))
}

/// POST /api/tasks
#[instrument(name = "create_task", skip(state))]
pub async fn create_task(
    State(state): State<AppState>,
    Json(request): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskModel>), AppError> {
    let task = state.task_service.create_task(request).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// PUT /api/tasks/{id}
#[instrument(name = "update_task", skip(state))]
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(request): Json<UpdateTaskRequest>,
) -> Result<Json<TaskModel>, AppError> {
    Ok(Json(state.task_service.update_task(id, request).await?))
}

/// DELETE /api/tasks/{id}
#[instrument(name = "delete_task", skip(state))]
pub async fn delete_task(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Value>, AppError> {
    state.task_service.delete_task(id).await?;
    Ok(Json(json!({ "message": "Task deleted" })))
}
