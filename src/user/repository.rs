use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use super::models::UserModel;
use crate::shared::AppError;

/// Trait for user repository operations
#[async_trait]
pub trait UserRepository {
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError>;
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError>;
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError>;
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError>;
}

/// In-memory implementation of UserRepository for development and testing
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, UserModel>>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == user.username) {
            warn!(username = %user.username, "Username already taken");
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        users.insert(user.user_id, user.clone());
        debug!(user_id = %user.user_id, "User created in memory");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        let users = self.users.read().await;
        let mut list: Vec<UserModel> = users.values().cloned().collect();
        list.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(list)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.user_id != user.user_id && u.username == user.username)
        {
            return Err(AppError::Conflict("Username already exists".to_string()));
        }
        match users.get_mut(&user.user_id) {
            Some(existing) => {
                *existing = user.clone();
                Ok(())
            }
            None => Err(AppError::NotFound("User not found".to_string())),
        }
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        match self.users.write().await.remove(&user_id) {
            Some(_) => Ok(()),
            None => Err(AppError::NotFound("User not found".to_string())),
        }
    }
}

/// PostgreSQL implementation of user repository
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> AppError {
    if let Some(db_error) = e.as_database_error() {
        if db_error.is_unique_violation() {
            return AppError::Conflict("Username already exists".to_string());
        }
    }
    warn!(error = %e, "User query failed");
    AppError::DatabaseError(e.to_string())
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    #[instrument(skip(self, user))]
    async fn create_user(&self, user: &UserModel) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO system_users (user_id, username, identification, email, is_active, group_id, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.identification)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.group_id)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn get_user(&self, user_id: Uuid) -> Result<Option<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT user_id, username, identification, email, is_active, group_id, created_at, updated_at FROM system_users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        sqlx::query_as::<_, UserModel>(
            "SELECT user_id, username, identification, email, is_active, group_id, created_at, updated_at FROM system_users ORDER BY username",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(database_error)
    }

    #[instrument(skip(self, user))]
    async fn update_user(&self, user: &UserModel) -> Result<(), AppError> {
        let result = sqlx::query(
            "UPDATE system_users SET username = $2, identification = $3, email = $4, is_active = $5, group_id = $6, updated_at = $7 WHERE user_id = $1",
        )
        .bind(user.user_id)
        .bind(&user.username)
        .bind(&user.identification)
        .bind(&user.email)
        .bind(user.is_active)
        .bind(user.group_id)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM system_users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(database_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_user(username: &str) -> UserModel {
        UserModel::new(
            username.to_string(),
            "0102030405".to_string(),
            format!("{}@example.com", username),
            true,
            None,
        )
    }

    #[tokio::test]
    async fn test_create_and_get_user() {
        let repo = InMemoryUserRepository::new();
        let user = create_test_user("ana");

        repo.create_user(&user).await.unwrap();

        assert_eq!(repo.get_user(user.user_id).await.unwrap(), Some(user));
    }

    #[tokio::test]
    async fn test_duplicate_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&create_test_user("ana")).await.unwrap();

        let result = repo.create_user(&create_test_user("ana")).await;

        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_rename_onto_existing_username_rejected() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(&create_test_user("ana")).await.unwrap();
        let mut bob = create_test_user("bob");
        repo.create_user(&bob).await.unwrap();

        bob.username = "ana".to_string();

        assert!(matches!(
            repo.update_user(&bob).await,
            Err(AppError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_user() {
        let repo = InMemoryUserRepository::new();

        let result = repo.delete_user(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
