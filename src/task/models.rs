use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Progress of a task
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Todo,
    InProgress,
    Done,
}

/// A task as stored in the task file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TaskModel {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub status: TaskStatus,
}

impl TaskModel {
    pub fn new(id: u64, title: String, description: String, status: TaskStatus) -> Self {
        Self {
            id,
            title,
            description,
            status,
        }
    }
}

/// Next free id for a task list: one past the highest id in use
pub fn next_task_id(tasks: &[TaskModel]) -> u64 {
    tasks.iter().map(|t| t.id).max().map_or(1, |max| max + 1)
}
