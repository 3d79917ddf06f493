//! Recipe catalog handlers.
//!
//! Split into a public router (browse and read) and a protected router
//! (everything that writes, plus the caller's favorites listing).

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::{NewRecipe, RecipeFilter, RecipePatch, RecipeResponse};
use crate::errors::AppResult;
use crate::types::MessageResponse;

/// Catalog filter query parameters.
///
/// The frontend sends its dropdown values verbatim, including the
/// "All Difficulties" and "Any Time" sentinels.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RecipeQuery {
    /// "Easy" | "Medium" | "Hard" | "All Difficulties"
    pub difficulty: Option<String>,
    /// "Under 30 min" | "30-60 min" | "Over 60 min" | "Any Time"
    pub time: Option<String>,
    /// Case-insensitive title substring
    pub search: Option<String>,
}

/// Like toggle response
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub message: String,
    pub liked_by_user: bool,
    pub like_count: usize,
    pub likes: Vec<Uuid>,
}

/// Create public recipe routes (no authentication)
pub fn recipe_public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_recipes))
        .route("/:id", get(get_recipe))
}

/// Create protected recipe routes (require JWT)
pub fn recipe_protected_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_recipe))
        .route("/favorites", get(list_favorites))
        .route("/:id", put(update_recipe))
        .route("/:id", delete(delete_recipe))
        .route("/:id/like", post(toggle_like))
}

/// List recipes matching the catalog filter
#[utoipa::path(
    get,
    path = "/api/recipes",
    tag = "Recipes",
    params(RecipeQuery),
    responses(
        (status = 200, description = "Matching recipes, newest first", body = [RecipeResponse]),
        (status = 400, description = "Unrecognized filter value")
    )
)]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<RecipeQuery>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let filter = RecipeFilter::from_query(
        query.difficulty.as_deref(),
        query.time.as_deref(),
        query.search.as_deref(),
    )?;

    let recipes = state.recipe_service.list_recipes(filter).await?;

    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}

/// Get a single recipe by ID
#[utoipa::path(
    get,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe found", body = RecipeResponse),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RecipeResponse>> {
    let recipe = state.recipe_service.get_recipe(id).await?;
    Ok(Json(RecipeResponse::from(recipe)))
}

/// Create a new recipe owned by the authenticated user
#[utoipa::path(
    post,
    path = "/api/recipes",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    request_body = NewRecipe,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn create_recipe(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<NewRecipe>,
) -> AppResult<(StatusCode, Json<RecipeResponse>)> {
    let recipe = state
        .recipe_service
        .create_recipe(current_user.id, payload)
        .await?;

    Ok((StatusCode::CREATED, Json(RecipeResponse::from(recipe))))
}

/// Update a recipe (owner only)
#[utoipa::path(
    put,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Recipe ID")),
    request_body = RecipePatch,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 403, description = "Not the recipe owner"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn update_recipe(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecipePatch>,
) -> AppResult<Json<RecipeResponse>> {
    let recipe = state
        .recipe_service
        .update_recipe(current_user.id, id, payload)
        .await?;

    Ok(Json(RecipeResponse::from(recipe)))
}

/// Delete a recipe (owner only)
#[utoipa::path(
    delete,
    path = "/api/recipes/{id}",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe deleted", body = MessageResponse),
        (status = 403, description = "Not the recipe owner"),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state.recipe_service.delete_recipe(current_user.id, id).await?;
    Ok(Json(MessageResponse::new("Recipe deleted")))
}

/// Toggle the authenticated user's like on a recipe
#[utoipa::path(
    post,
    path = "/api/recipes/{id}/like",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Like toggled", body = LikeToggleResponse),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn toggle_like(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<LikeToggleResponse>> {
    let like_state = state
        .favorites_service
        .toggle_like(id, current_user.id)
        .await?;

    let message = if like_state.liked_by_user {
        "Recipe liked"
    } else {
        "Recipe unliked"
    };

    Ok(Json(LikeToggleResponse {
        message: message.to_string(),
        liked_by_user: like_state.liked_by_user,
        like_count: like_state.like_count(),
        likes: like_state.likes,
    }))
}

/// List the authenticated user's favorite recipes
#[utoipa::path(
    get,
    path = "/api/recipes/favorites",
    tag = "Recipes",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Favorited recipes, newest first", body = [RecipeResponse]),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<Vec<RecipeResponse>>> {
    let recipes = state
        .favorites_service
        .favorites_for(current_user.id)
        .await?;

    Ok(Json(recipes.into_iter().map(RecipeResponse::from).collect()))
}
