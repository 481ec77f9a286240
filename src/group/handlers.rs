use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{info, instrument};
use uuid::Uuid;

use super::types::{CreateGroupRequest, GroupResponse, UpdateGroupRequest};
use crate::shared::{AppError, AppState};

/// GET /api/iam-user-groups
#[instrument(name = "list_groups", skip(state))]
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<GroupResponse>>, AppError> {
    let groups = state.group_service.list_groups().await?;
    Ok(Json(groups))
}

/// GET /api/iam-user-groups/{group_id}
#[instrument(name = "get_group", skip(state))]
pub async fn get_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = state.group_service.get_group(group_id).await?;
    Ok(Json(group))
}

/// POST /api/iam-user-groups
///
/// Returns 201 with the stored group. Clients connected to the relay are
/// notified with a GROUP_CREATED event on a best-effort basis.
#[instrument(name = "create_group", skip(state))]
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupResponse>), AppError> {
    info!(group_name = %request.group_name, "Creating new group");
    let group = state.group_service.create_group(request).await?;
    Ok((StatusCode::CREATED, Json(group)))
}

/// PUT /api/iam-user-groups/{group_id}
#[instrument(name = "update_group", skip(state))]
pub async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
    Json(request): Json<UpdateGroupRequest>,
) -> Result<Json<GroupResponse>, AppError> {
    let group = state.group_service.update_group(group_id, request).await?;
    Ok(Json(group))
}

/// DELETE /api/iam-user-groups/{group_id}
#[instrument(name = "delete_group", skip(state))]
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<Value>, AppError> {
    state.group_service.delete_group(group_id).await?;
    Ok(Json(json!({ "message": "Group deleted" })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{InMemoryEventPublisher, GROUP_CREATED};
    use crate::shared::test_utils::AppStateBuilder;
    use crate::routes::api_router;
    use axum::{body::Body, http::Request, Router};
    use std::sync::Arc;
    use tower::ServiceExt; // for `oneshot`

    fn app(publisher: Arc<InMemoryEventPublisher>) -> Router {
        api_router(AppStateBuilder::new().with_publisher(publisher).build())
    }

    fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_create_group_handler() {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let app = app(publisher.clone());

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/iam-user-groups",
                r#"{"group_name": "finance", "description": "Finance team"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let group: GroupResponse = body_json(response).await;
        assert_eq!(group.group_name, "finance");
        assert_eq!(group.description, "Finance team");

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].1.kind(), GROUP_CREATED);
    }

    #[tokio::test]
    async fn test_create_group_missing_fields() {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let app = app(publisher.clone());

        let response = app
            .oneshot(json_request("POST", "/api/iam-user-groups", r#"{"group_name": "finance"}"#))
            .await
            .unwrap();

        // Missing description is a structurally invalid body
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_create_group_empty_name() {
        let app = app(Arc::new(InMemoryEventPublisher::new()));

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/iam-user-groups",
                r#"{"group_name": "", "description": "x"}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_group_lifecycle() {
        let app = app(Arc::new(InMemoryEventPublisher::new()));

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/iam-user-groups",
                r#"{"group_name": "finance", "description": "Finance team"}"#,
            ))
            .await
            .unwrap();
        let created: GroupResponse = body_json(response).await;
        let uri = format!("/api/iam-user-groups/{}", created.group_id);

        let response = app
            .clone()
            .oneshot(json_request("PUT", &uri, r#"{"description": "Treasury"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let updated: GroupResponse = body_json(response).await;
        assert_eq!(updated.group_name, "finance");
        assert_eq!(updated.description, "Treasury");

        let response = app
            .clone()
            .oneshot(json_request("DELETE", &uri, ""))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = body_json(response).await;
        assert_eq!(body["message"], "Group deleted");

        let response = app
            .oneshot(Request::builder().uri(&uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_group_with_malformed_id() {
        let app = app(Arc::new(InMemoryEventPublisher::new()));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/iam-user-groups/not-a-uuid")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
