use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    models::GroupModel,
    repository::GroupRepository,
    types::{CreateGroupRequest, GroupResponse, UpdateGroupRequest},
};
use crate::event::{DomainEvent, EventPublisher};
use crate::shared::AppError;

/// Service for group business logic
///
/// Creation is the only mutation that notifies connected clients. The event
/// is published after the group is stored, and publishing can never turn a
/// successful creation into a failure.
pub struct GroupService {
    repository: Arc<dyn GroupRepository + Send + Sync>,
    publisher: Arc<dyn EventPublisher>,
    channel: String,
}

impl GroupService {
    pub fn new(
        repository: Arc<dyn GroupRepository + Send + Sync>,
        publisher: Arc<dyn EventPublisher>,
        channel: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            publisher,
            channel: channel.into(),
        }
    }

    #[instrument(skip(self))]
    pub async fn create_group(&self, request: CreateGroupRequest) -> Result<GroupResponse, AppError> {
        let group_name = request.group_name.trim().to_string();
        if group_name.is_empty() {
            return Err(AppError::BadRequest("group_name must not be empty".to_string()));
        }

        let model = GroupModel::new(group_name, request.description);
        self.repository.create_group(&model).await?;
        let group = GroupResponse::from(model);

        info!(group_id = %group.group_id, group_name = %group.group_name, "Group created");
        self.notify_created(&group);

        Ok(group)
    }

    fn notify_created(&self, group: &GroupResponse) {
        match DomainEvent::group_created(group) {
            Ok(event) => self.publisher.publish(&self.channel, &event),
            Err(e) => warn!(group_id = %group.group_id, error = %e, "Failed to build group created event"),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_groups(&self) -> Result<Vec<GroupResponse>, AppError> {
        let groups = self.repository.list_groups().await?;
        debug!(group_count = groups.len(), "Groups listed");
        Ok(groups.into_iter().map(GroupResponse::from).collect())
    }

    #[instrument(skip(self))]
    pub async fn get_group(&self, group_id: Uuid) -> Result<GroupResponse, AppError> {
        self.repository
            .get_group(group_id)
            .await?
            .map(GroupResponse::from)
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_group(
        &self,
        group_id: Uuid,
        request: UpdateGroupRequest,
    ) -> Result<GroupResponse, AppError> {
        if matches!(&request.group_name, Some(name) if name.trim().is_empty()) {
            return Err(AppError::BadRequest("group_name must not be empty".to_string()));
        }

        let mut model = self
            .repository
            .get_group(group_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Group not found".to_string()))?;

        model.apply_changes(
            request.group_name.map(|name| name.trim().to_string()),
            request.description,
        );
        self.repository.update_group(&model).await?;

        info!(group_id = %group_id, "Group updated");
        Ok(GroupResponse::from(model))
    }

    #[instrument(skip(self))]
    pub async fn delete_group(&self, group_id: Uuid) -> Result<(), AppError> {
        self.repository.delete_group(group_id).await?;
        info!(group_id = %group_id, "Group deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{InMemoryEventPublisher, RedisEventPublisher, GROUP_CREATED};
    use crate::group::repository::InMemoryGroupRepository;

    fn service_with(publisher: Arc<dyn EventPublisher>) -> GroupService {
        GroupService::new(
            Arc::new(InMemoryGroupRepository::new()),
            publisher,
            "notifications:groups",
        )
    }

    fn create_request(name: &str) -> CreateGroupRequest {
        CreateGroupRequest {
            group_name: name.to_string(),
            description: "team".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_publishes_group_created() {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let service = service_with(publisher.clone());

        let group = service.create_group(create_request("finance")).await.unwrap();

        let published = publisher.published();
        assert_eq!(published.len(), 1);
        let (channel, event) = &published[0];
        assert_eq!(channel, "notifications:groups");
        assert_eq!(event.kind(), GROUP_CREATED);
        assert_eq!(event.payload()["group_id"], group.group_id.to_string());
    }

    #[tokio::test]
    async fn test_create_succeeds_with_broker_unavailable() {
        let service = service_with(Arc::new(RedisEventPublisher::disabled()));

        let group = service.create_group(create_request("finance")).await.unwrap();

        assert_eq!(group.group_name, "finance");
        assert!(service.get_group(group.group_id).await.is_ok());
    }

    #[tokio::test]
    async fn test_invalid_create_publishes_nothing() {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let service = service_with(publisher.clone());

        let result = service.create_group(create_request("   ")).await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(publisher.published().is_empty());
    }

    #[tokio::test]
    async fn test_update_and_delete_do_not_publish() {
        let publisher = Arc::new(InMemoryEventPublisher::new());
        let service = service_with(publisher.clone());
        let group = service.create_group(create_request("finance")).await.unwrap();

        let updated = service
            .update_group(
                group.group_id,
                UpdateGroupRequest {
                    group_name: Some("treasury".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();
        service.delete_group(group.group_id).await.unwrap();

        assert_eq!(updated.group_name, "treasury");
        assert_eq!(updated.description, "team");
        assert_eq!(publisher.published().len(), 1);
    }

    #[tokio::test]
    async fn test_get_missing_group() {
        let service = service_with(Arc::new(InMemoryEventPublisher::new()));

        let result = service.get_group(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
