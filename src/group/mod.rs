// Public API - what other modules can use
pub use handlers::{create_group, delete_group, get_group, list_groups, update_group};
pub use service::GroupService;
pub use types::{CreateGroupRequest, GroupResponse, UpdateGroupRequest};

// Internal modules
mod handlers;
pub mod models;
pub mod repository;
mod service;
mod types;
