use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the groups table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct GroupModel {
    pub group_id: Uuid,
    pub group_name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl GroupModel {
    /// Creates a new group with a generated ID and fresh timestamps
    pub fn new(group_name: String, description: String) -> Self {
        let now = Utc::now();
        Self {
            group_id: Uuid::new_v4(),
            group_name,
            description,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies whichever fields are present and bumps `updated_at`
    pub fn apply_changes(&mut self, group_name: Option<String>, description: Option<String>) {
        if let Some(group_name) = group_name {
            self.group_name = group_name;
        }
        if let Some(description) = description {
            self.description = description;
        }
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_group_model() {
        let group = GroupModel::new("finance".to_string(), "Finance team".to_string());

        assert_eq!(group.group_name, "finance");
        assert_eq!(group.created_at, group.updated_at);
    }

    #[test]
    fn test_apply_changes_keeps_missing_fields() {
        let mut group = GroupModel::new("finance".to_string(), "Finance team".to_string());
        let created_at = group.created_at;

        group.apply_changes(None, Some("Accounts payable".to_string()));

        assert_eq!(group.group_name, "finance");
        assert_eq!(group.description, "Accounts payable");
        assert_eq!(group.created_at, created_at);
        assert!(group.updated_at >= created_at);
    }
}
