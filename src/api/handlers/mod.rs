//! HTTP request handlers.

pub mod auth_handler;
pub mod recipe_handler;
pub mod user_handler;

pub use auth_handler::auth_routes;
pub use recipe_handler::{recipe_protected_routes, recipe_public_routes};
pub use user_handler::user_routes;
