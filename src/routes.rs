use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::shared::AppState;
use crate::{group, task, user};

/// GET /api/ping
pub async fn ping() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Builds the HTTP API with every CRUD route mounted under `/api`
pub fn api_router(state: AppState) -> Router {
    Router::new()
        .route("/api/ping", get(ping))
        .route(
            "/api/iam-user-groups",
            get(group::list_groups).post(group::create_group),
        )
        .route(
            "/api/iam-user-groups/:group_id",
            get(group::get_group)
                .put(group::update_group)
                .delete(group::delete_group),
        )
        .route("/api/users", get(user::list_users).post(user::create_user))
        .route(
            "/api/users/:user_id",
            get(user::get_user)
                .put(user::update_user)
                .delete(user::delete_user),
        )
        .route("/api/tasks", get(task::list_tasks).post(task::create_task))
        .route(
            "/api/tasks/:id",
            get(task::get_task)
                .put(task::update_task)
                .delete(task::delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
