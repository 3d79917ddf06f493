//! Unit of Work - centralized repository access.
//!
//! Services depend on this registry instead of individual repositories,
//! so wiring stays in one place. Multi-step mutations (the like toggle)
//! ride on the repositories' own transactional primitives rather than a
//! caller-managed transaction scope; see `RecipeRepository::toggle_like`.

use std::sync::Arc;

use sea_orm::DatabaseConnection;

use super::repositories::{RecipeRepository, RecipeStore, UserRepository, UserStore};

/// Unit of Work trait for dependency injection.
pub trait UnitOfWork: Send + Sync {
    /// Get user repository
    fn users(&self) -> Arc<dyn UserRepository>;

    /// Get recipe repository
    fn recipes(&self) -> Arc<dyn RecipeRepository>;
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    user_repo: Arc<UserStore>,
    recipe_repo: Arc<RecipeStore>,
}

impl Persistence {
    /// Create new UnitOfWork instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            user_repo: Arc::new(UserStore::new(db.clone())),
            recipe_repo: Arc::new(RecipeStore::new(db)),
        }
    }
}

impl UnitOfWork for Persistence {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn recipes(&self) -> Arc<dyn RecipeRepository> {
        self.recipe_repo.clone()
    }
}
