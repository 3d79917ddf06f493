//! Recipe repository implementation.
//!
//! Assembles domain recipes from three tables (recipes, users,
//! recipe_likes) and owns the atomic like-toggle: the read-modify-write
//! on the like relation runs inside a single database transaction, so
//! concurrent toggles on the same recipe are serialized by the store
//! and no update is lost.

use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    ModelTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionError, TransactionTrait,
};
use uuid::Uuid;

use super::entities::{recipe, recipe_like, user};
use crate::domain::{Difficulty, LikeState, NewRecipe, Recipe, RecipeFilter, RecipeOwner,
    RecipePatch, TimeBucket};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Recipe repository trait for dependency injection.
///
/// `toggle_like`, `insert_like` and `remove_like` are the persistence
/// layer's atomic primitives for the unified like relation; callers never
/// read-modify-write like state themselves.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Find recipe by ID with owner and likes populated
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Recipe>>;

    /// List recipes matching the filter, newest first (id as tiebreak)
    async fn list(&self, filter: RecipeFilter) -> AppResult<Vec<Recipe>>;

    /// List the recipes a user has liked, newest first
    async fn list_liked_by(&self, user_id: Uuid) -> AppResult<Vec<Recipe>>;

    /// Persist a new recipe owned by `owner_id`
    async fn create(&self, owner_id: Uuid, recipe: NewRecipe) -> AppResult<Recipe>;

    /// Apply a partial update; fields absent from the patch keep their
    /// stored value. Fails `NotFound` if the row is gone.
    async fn update(&self, id: Uuid, patch: RecipePatch) -> AppResult<Recipe>;

    /// Delete a recipe (likes cascade). Fails `NotFound` if already gone.
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Atomically flip `(recipe_id, user_id)` membership in the like
    /// relation and report the resulting state.
    async fn toggle_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<LikeState>;

    /// Insert a like; returns false if it already existed.
    async fn insert_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<bool>;

    /// Remove a like; removing an absent like is a no-op.
    async fn remove_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of RecipeRepository over SeaORM
pub struct RecipeStore {
    db: DatabaseConnection,
}

impl RecipeStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch recipes (with owners) under a condition, newest first,
    /// then attach the like projections in one extra query.
    async fn fetch_recipes(&self, condition: Condition) -> AppResult<Vec<Recipe>> {
        let rows = recipe::Entity::find()
            .find_also_related(user::Entity)
            .filter(condition)
            .order_by_desc(recipe::Column::CreatedAt)
            .order_by_desc(recipe::Column::Id)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if rows.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = rows.iter().map(|(model, _)| model.id).collect();
        let like_rows = recipe_like::Entity::find()
            .filter(recipe_like::Column::RecipeId.is_in(ids))
            .order_by_asc(recipe_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        let mut likes_by_recipe: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        for row in like_rows {
            likes_by_recipe
                .entry(row.recipe_id)
                .or_default()
                .push(row.user_id);
        }

        rows.into_iter()
            .map(|(model, owner)| {
                let likes = likes_by_recipe.remove(&model.id).unwrap_or_default();
                assemble(model, owner, likes)
            })
            .collect()
    }

    async fn likes_for(&self, recipe_id: Uuid) -> AppResult<Vec<Uuid>> {
        let rows = recipe_like::Entity::find()
            .filter(recipe_like::Column::RecipeId.eq(recipe_id))
            .order_by_asc(recipe_like::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(rows.into_iter().map(|row| row.user_id).collect())
    }
}

#[async_trait]
impl RecipeRepository for RecipeStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Recipe>> {
        let row = recipe::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some((model, owner)) = row else {
            return Ok(None);
        };

        let likes = self.likes_for(id).await?;
        assemble(model, owner, likes).map(Some)
    }

    async fn list(&self, filter: RecipeFilter) -> AppResult<Vec<Recipe>> {
        self.fetch_recipes(filter_condition(&filter)).await
    }

    async fn list_liked_by(&self, user_id: Uuid) -> AppResult<Vec<Recipe>> {
        let liked = recipe_like::Entity::find()
            .filter(recipe_like::Column::UserId.eq(user_id))
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        if liked.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = liked.into_iter().map(|row| row.recipe_id).collect();
        self.fetch_recipes(Condition::all().add(recipe::Column::Id.is_in(ids)))
            .await
    }

    async fn create(&self, owner_id: Uuid, data: NewRecipe) -> AppResult<Recipe> {
        // Resolve the owner up front; a valid token whose user row is
        // missing cannot create recipes.
        let owner = user::Entity::find_by_id(owner_id)
            .one(&self.db)
            .await
            .map_err(AppError::from)?
            .ok_or(AppError::Unauthorized)?;

        let now = chrono::Utc::now();
        let ingredients = serde_json::to_value(&data.ingredients)
            .map_err(|e| AppError::internal(format!("Ingredient encoding failed: {}", e)))?;

        let active_model = recipe::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(data.title),
            description: Set(data.description),
            image_url: Set(data.image_url),
            cooking_time: Set(data.cooking_time),
            difficulty: Set(data.difficulty.as_str().to_string()),
            ingredients: Set(ingredients),
            instructions: Set(data.instructions),
            user_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        assemble(model, Some(owner), vec![])
    }

    async fn update(&self, id: Uuid, patch: RecipePatch) -> AppResult<Recipe> {
        let row = recipe::Entity::find_by_id(id)
            .find_also_related(user::Entity)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        let Some((model, owner)) = row else {
            return Err(AppError::NotFound);
        };

        let mut active: recipe::ActiveModel = model.into();

        if let Some(Some(title)) = patch.title {
            active.title = Set(title);
        }
        if let Some(Some(description)) = patch.description {
            active.description = Set(description);
        }
        if let Some(Some(image_url)) = patch.image_url {
            active.image_url = Set(image_url);
        }
        if let Some(Some(cooking_time)) = patch.cooking_time {
            active.cooking_time = Set(cooking_time);
        }
        if let Some(Some(difficulty)) = patch.difficulty {
            active.difficulty = Set(difficulty.as_str().to_string());
        }
        if let Some(Some(ingredients)) = patch.ingredients {
            let encoded = serde_json::to_value(&ingredients)
                .map_err(|e| AppError::internal(format!("Ingredient encoding failed: {}", e)))?;
            active.ingredients = Set(encoded);
        }
        if let Some(Some(instructions)) = patch.instructions {
            active.instructions = Set(instructions);
        }
        active.updated_at = Set(chrono::Utc::now());

        // A delete racing this update means zero rows touched; surface
        // that deterministically as NotFound.
        let model = active.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated => AppError::NotFound,
            other => AppError::from(other),
        })?;

        let likes = self.likes_for(id).await?;
        assemble(model, owner, likes)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = recipe::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        if result.rows_affected == 0 {
            return Err(AppError::NotFound);
        }

        Ok(())
    }

    async fn toggle_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<LikeState> {
        self.db
            .transaction::<_, LikeState, AppError>(move |txn| {
                Box::pin(async move {
                    recipe::Entity::find_by_id(recipe_id)
                        .one(txn)
                        .await
                        .map_err(AppError::from)?
                        .ok_or(AppError::NotFound)?;

                    let existing = recipe_like::Entity::find_by_id((recipe_id, user_id))
                        .one(txn)
                        .await
                        .map_err(AppError::from)?;

                    let liked_by_user = match existing {
                        Some(row) => {
                            row.delete(txn).await.map_err(AppError::from)?;
                            false
                        }
                        None => {
                            recipe_like::ActiveModel {
                                recipe_id: Set(recipe_id),
                                user_id: Set(user_id),
                                created_at: Set(chrono::Utc::now()),
                            }
                            .insert(txn)
                            .await
                            .map_err(like_insert_error)?;
                            true
                        }
                    };

                    let likes = recipe_like::Entity::find()
                        .filter(recipe_like::Column::RecipeId.eq(recipe_id))
                        .order_by_asc(recipe_like::Column::CreatedAt)
                        .all(txn)
                        .await
                        .map_err(AppError::from)?
                        .into_iter()
                        .map(|row| row.user_id)
                        .collect();

                    Ok(LikeState {
                        liked_by_user,
                        likes,
                    })
                })
            })
            .await
            .map_err(transaction_error)
    }

    async fn insert_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<bool> {
        self.db
            .transaction::<_, bool, AppError>(move |txn| {
                Box::pin(async move {
                    recipe::Entity::find_by_id(recipe_id)
                        .one(txn)
                        .await
                        .map_err(AppError::from)?
                        .ok_or(AppError::NotFound)?;

                    let existing = recipe_like::Entity::find_by_id((recipe_id, user_id))
                        .one(txn)
                        .await
                        .map_err(AppError::from)?;

                    if existing.is_some() {
                        return Ok(false);
                    }

                    recipe_like::ActiveModel {
                        recipe_id: Set(recipe_id),
                        user_id: Set(user_id),
                        created_at: Set(chrono::Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .map_err(like_insert_error)?;

                    Ok(true)
                })
            })
            .await
            .map_err(transaction_error)
    }

    async fn remove_like(&self, recipe_id: Uuid, user_id: Uuid) -> AppResult<()> {
        recipe_like::Entity::delete_by_id((recipe_id, user_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }
}

/// Translate the catalog filter into a SQL condition. Mirrors
/// `RecipeFilter::matches`; the two must agree on the bucket boundaries.
fn filter_condition(filter: &RecipeFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(difficulty) = filter.difficulty {
        condition = condition.add(recipe::Column::Difficulty.eq(difficulty.as_str()));
    }

    if let Some(bucket) = filter.time {
        condition = match bucket {
            TimeBucket::Under30 => condition.add(recipe::Column::CookingTime.lte(30)),
            TimeBucket::Between30And60 => condition
                .add(recipe::Column::CookingTime.gt(30))
                .add(recipe::Column::CookingTime.lte(60)),
            TimeBucket::Over60 => condition.add(recipe::Column::CookingTime.gt(60)),
        };
    }

    if let Some(term) = &filter.search {
        let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
        condition = condition.add(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        recipe::Entity,
                        recipe::Column::Title,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        recipe::Entity,
                        recipe::Column::Description,
                    ))))
                    .like(pattern),
                ),
        );
    }

    condition
}

/// Escape LIKE wildcards in a user-supplied search term
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build a domain recipe from its rows. Missing owners and corrupt
/// columns are store-level faults, not client errors.
fn assemble(
    model: recipe::Model,
    owner: Option<user::Model>,
    likes: Vec<Uuid>,
) -> AppResult<Recipe> {
    let owner = owner.ok_or_else(|| {
        AppError::internal(format!("Recipe {} has no owner row", model.id))
    })?;

    let difficulty = Difficulty::try_from(model.difficulty.as_str()).map_err(|_| {
        AppError::internal(format!(
            "Recipe {} has invalid difficulty '{}'",
            model.id, model.difficulty
        ))
    })?;

    let ingredients: Vec<String> = serde_json::from_value(model.ingredients)
        .map_err(|e| AppError::internal(format!("Recipe {} ingredients corrupt: {}", model.id, e)))?;

    Ok(Recipe {
        id: model.id,
        title: model.title,
        description: model.description,
        image_url: model.image_url,
        cooking_time: model.cooking_time,
        difficulty,
        ingredients,
        instructions: model.instructions,
        owner: RecipeOwner {
            id: owner.id,
            username: owner.username,
        },
        likes,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

/// Map a failed like insert back to AppError.
///
/// The existence check at the top of the transaction does not lock the
/// recipe row, so a concurrent delete can cascade the recipe away
/// between the check and the insert. The insert then trips the foreign
/// key on recipe_id, which is the same condition the existence check
/// guards against and gets the same answer: NotFound.
fn like_insert_error(e: DbErr) -> AppError {
    match e.sql_err() {
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => AppError::NotFound,
        _ => AppError::from(e),
    }
}

/// Unwrap SeaORM's transaction error wrapper back into AppError
fn transaction_error(e: TransactionError<AppError>) -> AppError {
    match e {
        TransactionError::Connection(db) => AppError::from(db),
        TransactionError::Transaction(app) => app,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Constraint violations other than the recipe FK must still surface
    // as database errors, not NotFound.
    #[test]
    fn test_like_insert_error_passes_other_errors_through() {
        let err = like_insert_error(DbErr::Custom("connection reset".to_string()));
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_transaction_error_unwraps_app_error() {
        let err = transaction_error(TransactionError::Transaction(AppError::NotFound));
        assert!(matches!(err, AppError::NotFound));
    }
}
