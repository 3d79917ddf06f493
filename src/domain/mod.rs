//! Domain layer - Core business entities and logic
//!
//! This module contains the core domain models that represent
//! business concepts independent of infrastructure concerns.
//!
//! Contains: Entities, Value Objects, the ownership guard, and the
//! catalog filter. No infrastructure dependencies (except error types).

pub mod catalog;
pub mod ownership;
pub mod password;
pub mod recipe;
pub mod user;

pub use catalog::{RecipeFilter, TimeBucket};
pub use ownership::{require_owner, Owned};
pub use password::Password;
pub use recipe::{
    Difficulty, LikeState, NewRecipe, Recipe, RecipeOwner, RecipePatch, RecipeResponse,
};
pub use user::{User, UserResponse};
