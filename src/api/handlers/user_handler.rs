//! User profile and favorites handlers.
//!
//! All routes here sit behind the auth middleware, so handlers read the
//! acting user from request extensions.

use axum::{
    extract::{Path, State},
    response::Json,
    routing::{delete, get, post},
    Extension, Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::CurrentUser;
use crate::api::AppState;
use crate::domain::RecipeResponse;
use crate::errors::AppResult;
use crate::services::parallel;
use crate::types::MessageResponse;

/// Add-to-favorites request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    /// Recipe to add to the caller's favorites
    pub recipe_id: Uuid,
}

/// Profile response with favorites populated as full recipes
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub favorites: Vec<RecipeResponse>,
}

/// Create protected user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .route("/favorites", post(add_favorite))
        .route("/favorites/:recipe_id", delete(remove_favorite))
}

/// Get the authenticated user's profile with favorites populated
#[utoipa::path(
    get,
    path = "/api/users/profile",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile with populated favorites", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<ProfileResponse>> {
    // Profile reads are cache-first; favorites always come from the
    // database so a toggle is visible immediately.
    let cached = state.cache.get_user(&current_user.id).await.ok().flatten();

    let (user, favorites) = match cached {
        Some(user) => {
            let favorites = state.favorites_service.favorites_for(current_user.id).await?;
            (user, favorites)
        }
        None => {
            let (user, favorites) = parallel::join2(
                state.user_service.get_user(current_user.id),
                state.favorites_service.favorites_for(current_user.id),
            )
            .await?;

            if let Err(e) = state.cache.set_user(&user).await {
                tracing::warn!(error = %e, "Failed to cache user profile");
            }
            (user, favorites)
        }
    };

    Ok(Json(ProfileResponse {
        id: user.id,
        username: user.username,
        email: user.email,
        favorites: favorites.into_iter().map(RecipeResponse::from).collect(),
    }))
}

/// Add a recipe to the authenticated user's favorites
#[utoipa::path(
    post,
    path = "/api/users/favorites",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = AddFavoriteRequest,
    responses(
        (status = 200, description = "Recipe added to favorites", body = MessageResponse),
        (status = 404, description = "Recipe not found"),
        (status = 409, description = "Recipe already in favorites")
    )
)]
pub async fn add_favorite(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<AddFavoriteRequest>,
) -> AppResult<Json<MessageResponse>> {
    state
        .favorites_service
        .add_favorite(payload.recipe_id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Recipe added to favorites")))
}

/// Remove a recipe from the authenticated user's favorites
#[utoipa::path(
    delete,
    path = "/api/users/favorites/{recipe_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("recipe_id" = Uuid, Path, description = "Recipe ID")),
    responses(
        (status = 200, description = "Recipe removed from favorites", body = MessageResponse),
        (status = 404, description = "Recipe not found")
    )
)]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    state
        .favorites_service
        .remove_favorite(recipe_id, current_user.id)
        .await?;

    Ok(Json(MessageResponse::new("Recipe removed from favorites")))
}
