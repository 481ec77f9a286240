use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use thiserror::Error;
use tracing::error;

use crate::group::GroupService;
use crate::task::TaskService;
use crate::user::UserService;

/// Shared application state containing all dependencies
#[derive(Clone)]
pub struct AppState {
    pub group_service: Arc<GroupService>,
    pub user_service: Arc<UserService>,
    pub task_service: Arc<TaskService>,
}

impl AppState {
    pub fn new(
        group_service: Arc<GroupService>,
        user_service: Arc<UserService>,
        task_service: Arc<TaskService>,
    ) -> Self {
        Self {
            group_service,
            user_service,
            task_service,
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error")]
    Internal,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            AppError::DatabaseError(msg) => {
                error!(error = %msg, "Request failed on database");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Database error: {}", msg),
                )
            }
            AppError::StorageError(msg) => {
                error!(error = %msg, "Request failed on task storage");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    format!("Storage error: {}", msg),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message
        }));

        (status, body).into_response()
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::BadRequest("bad".to_string()), StatusCode::BAD_REQUEST)]
    #[case(AppError::NotFound("gone".to_string()), StatusCode::NOT_FOUND)]
    #[case(AppError::Conflict("taken".to_string()), StatusCode::CONFLICT)]
    #[case(AppError::DatabaseError("down".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::StorageError("disk".to_string()), StatusCode::INTERNAL_SERVER_ERROR)]
    #[case(AppError::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_error_status(#[case] error: AppError, #[case] expected: StatusCode) {
        assert_eq!(error.into_response().status(), expected);
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = AppError::NotFound("Group not found".to_string()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(value, json!({ "error": "Group not found" }));
    }
}
