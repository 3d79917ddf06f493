//! Recipe service - Handles recipe catalog business logic.
//!
//! SOLID (SRP): Handles recipe use cases only; like management lives in
//! the favorites service.
//! DDD: Orchestrates domain validation and ownership checks via Unit of
//! Work, leaving persistence details to the repository.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::domain::{require_owner, NewRecipe, Recipe, RecipeFilter, RecipePatch};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Recipe service trait for dependency injection.
#[async_trait]
pub trait RecipeService: Send + Sync {
    /// Create a new recipe owned by `owner_id`
    async fn create_recipe(&self, owner_id: Uuid, recipe: NewRecipe) -> AppResult<Recipe>;

    /// Get recipe by ID
    async fn get_recipe(&self, id: Uuid) -> AppResult<Recipe>;

    /// List recipes matching the filter, newest first
    async fn list_recipes(&self, filter: RecipeFilter) -> AppResult<Vec<Recipe>>;

    /// Apply a partial update; only the owner may edit
    async fn update_recipe(
        &self,
        acting_user_id: Uuid,
        id: Uuid,
        patch: RecipePatch,
    ) -> AppResult<Recipe>;

    /// Delete a recipe; only the owner may delete
    async fn delete_recipe(&self, acting_user_id: Uuid, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RecipeService using Unit of Work.
pub struct RecipeManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RecipeManager<U> {
    /// Create new recipe service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> RecipeService for RecipeManager<U> {
    async fn create_recipe(&self, owner_id: Uuid, recipe: NewRecipe) -> AppResult<Recipe> {
        recipe.validate()?;
        self.uow.recipes().create(owner_id, recipe).await
    }

    async fn get_recipe(&self, id: Uuid) -> AppResult<Recipe> {
        self.uow
            .recipes()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn list_recipes(&self, filter: RecipeFilter) -> AppResult<Vec<Recipe>> {
        self.uow.recipes().list(filter).await
    }

    async fn update_recipe(
        &self,
        acting_user_id: Uuid,
        id: Uuid,
        patch: RecipePatch,
    ) -> AppResult<Recipe> {
        // Existence is checked before ownership so editing a missing
        // recipe reads as 404, not 403.
        let existing = self
            .uow
            .recipes()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        require_owner(acting_user_id, &existing)?;
        patch.validate()?;

        if patch.is_empty() {
            return Ok(existing);
        }

        self.uow.recipes().update(id, patch).await
    }

    async fn delete_recipe(&self, acting_user_id: Uuid, id: Uuid) -> AppResult<()> {
        let existing = self
            .uow
            .recipes()
            .find_by_id(id)
            .await?
            .ok_or(AppError::NotFound)?;

        require_owner(acting_user_id, &existing)?;
        self.uow.recipes().delete(id).await
    }
}
