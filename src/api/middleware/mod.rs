//! API middleware.

mod auth;

pub use auth::{require_authenticated, require_role, AdminUser, CurrentUser};
