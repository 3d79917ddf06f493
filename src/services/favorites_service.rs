//! Favorites service - Handles the like/favorite relation.
//!
//! A "favorite" and a "like" are two views of the same row in the like
//! relation: favoriting a recipe from the profile page and liking it on
//! the recipe page touch the same state. All mutations go through the
//! repository's atomic primitives, so concurrent requests never lose
//! updates.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{LikeState, Recipe};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Favorites service trait for dependency injection.
#[async_trait]
pub trait FavoritesService: Send + Sync {
    /// Flip the user's like on a recipe and report the resulting state
    async fn toggle_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<LikeState>;

    /// Add a recipe to the user's favorites; duplicate adds conflict
    async fn add_favorite(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// Remove a recipe from the user's favorites; removing an absent
    /// favorite succeeds
    async fn remove_favorite(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()>;

    /// List the recipes a user has favorited, newest first
    async fn favorites_for(&self, user_id: Uuid) -> AppResult<Vec<Recipe>>;
}

/// Concrete implementation of FavoritesService using Unit of Work.
pub struct FavoritesManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FavoritesManager<U> {
    /// Create new favorites service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Both directions of the relation require the recipe to exist.
    async fn ensure_recipe_exists(&self, recipe_id: Uuid) -> AppResult<()> {
        self.uow
            .recipes()
            .find_by_id(recipe_id)
            .await?
            .ok_or(AppError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl<U: UnitOfWork> FavoritesService for FavoritesManager<U> {
    async fn toggle_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<LikeState> {
        self.ensure_recipe_exists(recipe_id).await?;
        self.uow.recipes().toggle_like(recipe_id, user_id).await
    }

    async fn add_favorite(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.ensure_recipe_exists(recipe_id).await?;

        let inserted = self.uow.recipes().insert_like(recipe_id, user_id).await?;
        if !inserted {
            return Err(AppError::conflict("Favorite"));
        }
        Ok(())
    }

    async fn remove_favorite(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()> {
        self.ensure_recipe_exists(recipe_id).await?;
        self.uow.recipes().remove_like(recipe_id, user_id).await
    }

    async fn favorites_for(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        self.uow.recipes().list_liked_by(user_id).await
    }
}
