use std::sync::Arc;
use tracing::{info, instrument};

use super::{
    models::TaskModel,
    repository::{NewTask, TaskRepository},
    types::{CreateTaskRequest, UpdateTaskRequest},
};
use crate::shared::AppError;

/// Service for task business logic
pub struct TaskService {
    repository: Arc<dyn TaskRepository + Send + Sync>,
}

impl TaskService {
    pub fn new(repository: Arc<dyn TaskRepository + Send + Sync>) -> Self {
        Self { repository }
    }

    pub async fn list_tasks(&self) -> Result<Vec<TaskModel>, AppError> {
        self.repository.list_tasks().await
    }

    pub async fn get_task(&self, id: u64) -> Result<TaskModel, AppError> {
        self.repository
            .get_task(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Task {} not found", id)))
    }

    #[instrument(skip(self))]
    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<TaskModel, AppError> {
        let title = request.title.trim();
        if title.is_empty() {
            return Err(AppError::BadRequest("title must not be empty".to_string()));
        }

        let task = self
            .repository
            .create_task(NewTask {
                title: title.to_string(),
                description: request.description,
                status: request.status,
            })
            .await?;

        info!(task_id = task.id, status = %task.status, "Task created");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn update_task(
        &self,
        id: u64,
        request: UpdateTaskRequest,
    ) -> Result<TaskModel, AppError> {
        let mut task = self.get_task(id).await?;

        if let Some(title) = request.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(AppError::BadRequest("title must not be empty".to_string()));
            }
            task.title = title.to_string();
        }
        if let Some(description) = request.description {
            task.description = description;
        }
        if let Some(status) = request.status {
            task.status = status;
        }

        self.repository.update_task(&task).await?;
        info!(task_id = id, status = %task.status, "Task updated");
        Ok(task)
    }

    #[instrument(skip(self))]
    pub async fn delete_task(&self, id: u64) -> Result<(), AppError> {
        self.repository.delete_task(id).await?;
        info!(task_id = id, "Task deleted");
        Ok(())
    }
}
