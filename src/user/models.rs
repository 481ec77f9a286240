use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the system_users table
///
/// Credentials are not part of this model.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct UserModel {
    pub user_id: Uuid,
    pub username: String,
    pub identification: String,
    pub email: String,
    pub is_active: bool,
    pub group_id: Option<Uuid>, // FK to groups
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserModel {
    pub fn new(
        username: String,
        identification: String,
        email: String,
        is_active: bool,
        group_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: Uuid::new_v4(),
            username,
            identification,
            email,
            is_active,
            group_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
