pub use handlers::{create_task, delete_task, get_task, list_tasks, update_task};
pub use models::{TaskModel, TaskStatus};
pub use service::TaskService;
pub use types::{CreateTaskRequest, UpdateTaskRequest};

mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
