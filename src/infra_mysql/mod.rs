mod auth_repo_mysql;

pub use auth_repo_mysql::*;
