use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::models::GroupModel;

/// Request payload for creating a group
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub description: String,
}

/// Request payload for updating a group; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateGroupRequest {
    pub group_name: Option<String>,
    pub description: Option<String>,
}

/// Group as returned by the API and carried in GROUP_CREATED events
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupResponse {
    pub group_id: Uuid,
    pub group_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GroupModel> for GroupResponse {
    fn from(model: GroupModel) -> Self {
        Self {
            group_id: model.group_id,
            group_name: model.group_name,
            description: model.description,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
