mod auth_service_impl;
mod csrf;
mod password_hasher;

pub use auth_service_impl::*;
pub use csrf::*;
pub use password_hasher::*;
