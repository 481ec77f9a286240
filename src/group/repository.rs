use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::GroupModel;
use crate::shared::AppError;

/// Trait for group repository operations
#[async_trait]
pub trait GroupRepository {
    async fn create_group(&self, group: &GroupModel) -> Result<(), AppError>;
    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupModel>, AppError>;
    async fn list_groups(&self) -> Result<Vec<GroupModel>, AppError>;
    async fn update_group(&self, group: &GroupModel) -> Result<(), AppError>;
    async fn delete_group(&self, group_id: Uuid) -> Result<(), AppError>;
}

/// In-memory implementation of GroupRepository for development and testing
pub struct InMemoryGroupRepository {
    groups: RwLock<HashMap<Uuid, GroupModel>>,
}

impl Default for InMemoryGroupRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGroupRepository {
    pub fn new() -> Self {
        Self {
            groups: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    #[instrument(skip(self, group))]
    async fn create_group(&self, group: &GroupModel) -> Result<(), AppError> {
        debug!(group_id = %group.group_id, group_name = %group.group_name, "Creating group in memory");

        let mut groups = self.groups.write().await;
        if groups.contains_key(&group.group_id) {
            warn!(group_id = %group.group_id, "Group already exists in memory");
            return Err(AppError::DatabaseError("Group already exists".to_string()));
        }
        groups.insert(group.group_id, group.clone());
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupModel>, AppError> {
        let groups = self.groups.read().await;
        Ok(groups.get(&group_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_groups(&self) -> Result<Vec<GroupModel>, AppError> {
        let groups = self.groups.read().await;
        let mut list: Vec<GroupModel> = groups.values().cloned().collect();
        list.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.group_name.cmp(&b.group_name))
        });
        Ok(list)
    }

    #[instrument(skip(self, group))]
    async fn update_group(&self, group: &GroupModel) -> Result<(), AppError> {
        let mut groups = self.groups.write().await;
        match groups.get_mut(&group.group_id) {
            Some(existing) => {
                *existing = group.clone();
                debug!(group_id = %group.group_id, "Group updated in memory");
                Ok(())
            }
            None => {
                warn!(group_id = %group.group_id, "Group not found for update in memory");
                Err(AppError::NotFound("Group not found".to_string()))
            }
        }
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: Uuid) -> Result<(), AppError> {
        let mut groups = self.groups.write().await;
        if groups.remove(&group_id).is_none() {
            warn!(group_id = %group_id, "Group not found for deletion in memory");
            return Err(AppError::NotFound("Group not found".to_string()));
        }
        Ok(())
    }
}

/// PostgreSQL implementation of group repository
pub struct PostgresGroupRepository {
    pool: PgPool,
}

impl PostgresGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GroupRepository for PostgresGroupRepository {
    #[instrument(skip(self, group))]
    async fn create_group(&self, group: &GroupModel) -> Result<(), AppError> {
        debug!(group_id = %group.group_id, "Creating group in database");

        sqlx::query(
            "INSERT INTO groups (group_id, group_name, description, created_at, updated_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(group.group_id)
        .bind(&group.group_name)
        .bind(&group.description)
        .bind(group.created_at)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to create group in database");
            AppError::DatabaseError(e.to_string())
        })?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_group(&self, group_id: Uuid) -> Result<Option<GroupModel>, AppError> {
        sqlx::query_as::<_, GroupModel>(
            "SELECT group_id, group_name, description, created_at, updated_at FROM groups WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, group_id = %group_id, "Failed to fetch group from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self))]
    async fn list_groups(&self) -> Result<Vec<GroupModel>, AppError> {
        sqlx::query_as::<_, GroupModel>(
            "SELECT group_id, group_name, description, created_at, updated_at FROM groups ORDER BY created_at, group_name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, "Failed to list groups from database");
            AppError::DatabaseError(e.to_string())
        })
    }

    #[instrument(skip(self, group))]
    async fn update_group(&self, group: &GroupModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE groups SET group_name = $2, description = $3, updated_at = $4 WHERE group_id = $1",
        )
        .bind(group.group_id)
        .bind(&group.group_name)
        .bind(&group.description)
        .bind(group.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            warn!(error = %e, group_id = %group.group_id, "Failed to update group in database");
            AppError::DatabaseError(e.to_string())
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Group not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_group(&self, group_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM groups WHERE group_id = $1")
            .bind(group_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                warn!(error = %e, group_id = %group_id, "Failed to delete group from database");
                AppError::DatabaseError(e.to_string())
            })?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Group not found".to_string()));
        }
        Ok(())
    }
}
