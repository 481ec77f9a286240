use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, instrument, warn};

use super::models::{next_task_id, TaskModel, TaskStatus};
use crate::shared::AppError;

/// Fields for a task that has not been assigned an id yet
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub status: TaskStatus,
}

/// Trait for task repository operations
#[async_trait]
pub trait TaskRepository {
    async fn list_tasks(&self) -> Result<Vec<TaskModel>, AppError>;
    async fn get_task(&self, id: u64) -> Result<Option<TaskModel>, AppError>;
    /// Stores the task under the next free id and returns it
    async fn create_task(&self, task: NewTask) -> Result<TaskModel, AppError>;
    async fn update_task(&self, task: &TaskModel) -> Result<(), AppError>;
    async fn delete_task(&self, id: u64) -> Result<(), AppError>;
}

fn task_not_found(id: u64) -> AppError {
    AppError::NotFound(format!("Task {} not found", id))
}

/// In-memory implementation of TaskRepository for testing
#[derive(Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<Vec<TaskModel>>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list_tasks(&self) -> Result<Vec<TaskModel>, AppError> {
        Ok(self.tasks.read().await.clone())
    }

    async fn get_task(&self, id: u64) -> Result<Option<TaskModel>, AppError> {
        Ok(self.tasks.read().await.iter().find(|t| t.id == id).cloned())
    }

    async fn create_task(&self, task: NewTask) -> Result<TaskModel, AppError> {
        let mut tasks = self.tasks.write().await;
        let created = TaskModel::new(
            next_task_id(&tasks),
            task.title,
            task.description,
            task.status,
        );
        tasks.push(created.clone());
        Ok(created)
    }

    async fn update_task(&self, task: &TaskModel) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        let existing = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| task_not_found(task.id))?;
        *existing = task.clone();
        Ok(())
    }

    async fn delete_task(&self, id: u64) -> Result<(), AppError> {
        let mut tasks = self.tasks.write().await;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(task_not_found(id));
        }
        Ok(())
    }
}

/// Task repository backed by a JSON array on disk
///
/// Every mutation reads the whole file, applies the change and writes it back
/// through a temporary file, all while holding `lock`.
pub struct JsonFileTaskRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

fn storage_error(path: &Path, e: impl std::fmt::Display) -> AppError {
    warn!(path = %path.display(), error = %e, "Task storage failed");
    AppError::StorageError(e.to_string())
}

impl JsonFileTaskRepository {
    /// Opens the task file, creating its directory and an empty list if needed
    #[instrument]
    pub async fn open(path: impl Into<PathBuf> + std::fmt::Debug) -> Result<Self, AppError> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| storage_error(&path, e))?;
        }
        if !tokio::fs::try_exists(&path)
            .await
            .map_err(|e| storage_error(&path, e))?
        {
            tokio::fs::write(&path, b"[]")
                .await
                .map_err(|e| storage_error(&path, e))?;
            debug!(path = %path.display(), "Created empty task file");
        }

        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    async fn load(&self) -> Result<Vec<TaskModel>, AppError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| storage_error(&self.path, e))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        serde_json::from_slice(&bytes).map_err(|e| storage_error(&self.path, e))
    }

    async fn save(&self, tasks: &[TaskModel]) -> Result<(), AppError> {
        let body = serde_json::to_vec_pretty(tasks).map_err(|e| storage_error(&self.path, e))?;
        let staging = self.path.with_extension("json.tmp");
        tokio::fs::write(&staging, body)
            .await
            .map_err(|e| storage_error(&staging, e))?;
        tokio::fs::rename(&staging, &self.path)
            .await
            .map_err(|e| storage_error(&self.path, e))
    }
}

#[async_trait]
impl TaskRepository for JsonFileTaskRepository {
    #[instrument(skip(self))]
    async fn list_tasks(&self) -> Result<Vec<TaskModel>, AppError> {
        let _guard = self.lock.lock().await;
        self.load().await
    }

    #[instrument(skip(self))]
    async fn get_task(&self, id: u64) -> Result<Option<TaskModel>, AppError> {
        let _guard = self.lock.lock().await;
        Ok(self.load().await?.into_iter().find(|t| t.id == id))
    }

    #[instrument(skip(self, task))]
    async fn create_task(&self, task: NewTask) -> Result<TaskModel, AppError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;
        let created = TaskModel::new(
            next_task_id(&tasks),
            task.title,
            task.description,
            task.status,
        );
        tasks.push(created.clone());
        self.save(&tasks).await?;
        debug!(task_id = created.id, "Task written to file");
        Ok(created)
    }

    #[instrument(skip(self, task), fields(task_id = task.id))]
    async fn update_task(&self, task: &TaskModel) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;
        let existing = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| task_not_found(task.id))?;
        *existing = task.clone();
        self.save(&tasks).await
    }

    #[instrument(skip(self))]
    async fn delete_task(&self, id: u64) -> Result<(), AppError> {
        let _guard = self.lock.lock().await;
        let mut tasks = self.load().await?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return Err(task_not_found(id));
        }
        self.save(&tasks).await
    }
}
