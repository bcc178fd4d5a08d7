// store

mod auth_session_store;

pub use auth_session_store::*;

// repo

mod auth_repo;

pub use auth_repo::*;
