mod auth_repo_memory;
mod auth_session_store_memory;

pub use auth_repo_memory::*;
pub use auth_session_store_memory::*;
