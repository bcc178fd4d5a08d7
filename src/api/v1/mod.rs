mod cookie;
mod error;
mod handler;
mod router;


pub use cookie::{CSRF_COOKIE, CSRF_HEADER, CookiePolicy, SESSION_COOKIE};
pub use error::recover_error;
pub use router::routes;
