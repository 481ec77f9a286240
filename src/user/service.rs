use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    models::UserModel,
    repository::UserRepository,
    types::{CreateUserRequest, UpdateUserRequest},
};
use crate::shared::AppError;

/// Service for user business logic
pub struct UserService {
    repository: Arc<dyn UserRepository + Send + Sync>,
}

fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<(), AppError> {
    require_non_empty("email", value)?;
    if !value.contains('@') {
        return Err(AppError::BadRequest("email is not valid".to_string()));
    }
    Ok(())
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    #[instrument(skip(self))]
    pub async fn create_user(&self, request: CreateUserRequest) -> Result<UserModel, AppError> {
        require_non_empty("username", &request.username)?;
        require_non_empty("identification", &request.identification)?;
        require_email(&request.email)?;

        let user = UserModel::new(
            request.username,
            request.identification,
            request.email,
            request.is_active,
            request.group_id,
        );
        self.repository.create_user(&user).await?;

        info!(user_id = %user.user_id, username = %user.username, "User created");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserModel>, AppError> {
        self.repository.list_users().await
    }

    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<UserModel, AppError> {
        self.repository
            .get_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    #[instrument(skip(self))]
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: UpdateUserRequest,
    ) -> Result<UserModel, AppError> {
        let mut user = self.get_user(user_id).await?;

        if let Some(username) = request.username {
            require_non_empty("username", &username)?;
            user.username = username;
        }
        if let Some(identification) = request.identification {
            require_non_empty("identification", &identification)?;
            user.identification = identification;
        }
        if let Some(email) = request.email {
            require_email(&email)?;
            user.email = email;
        }
        if let Some(is_active) = request.is_active {
            user.is_active = is_active;
        }
        if let Some(group_id) = request.group_id {
            user.group_id = group_id;
        }
        user.touch();

        self.repository.update_user(&user).await?;
        info!(user_id = %user_id, "User updated");
        Ok(user)
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), AppError> {
        self.repository.delete_user(user_id).await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }
}
