//! HTTP request handlers.

pub mod auth_handler;
pub mod item_handler;

pub use auth_handler::auth_routes;
pub use item_handler::item_routes;
