// Public API - what other modules can use
pub use handlers::{create_user, delete_user, get_user, list_users, update_user};
pub use service::UserService;
pub use types::{CreateUserRequest, UpdateUserRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
