//! OpenAPI documentation configuration.
//!
//! Provides Swagger UI for API exploration and testing.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{auth_handler, recipe_handler, user_handler};
use crate::domain::{Difficulty, NewRecipe, RecipeOwner, RecipePatch, RecipeResponse, UserResponse};
use crate::services::TokenResponse;
use crate::types::MessageResponse;

/// OpenAPI documentation for the Tastebook API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tastebook API",
        version = "0.1.0",
        description = "A recipe sharing API with Axum, SeaORM, and clean architecture",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        // User endpoints
        auth_handler::register,
        auth_handler::login,
        user_handler::get_profile,
        user_handler::add_favorite,
        user_handler::remove_favorite,
        // Recipe endpoints
        recipe_handler::list_recipes,
        recipe_handler::get_recipe,
        recipe_handler::create_recipe,
        recipe_handler::update_recipe,
        recipe_handler::delete_recipe,
        recipe_handler::toggle_like,
        recipe_handler::list_favorites,
    ),
    components(
        schemas(
            // Domain types
            Difficulty,
            RecipeOwner,
            RecipeResponse,
            NewRecipe,
            RecipePatch,
            UserResponse,
            // Auth types
            auth_handler::RegisterRequest,
            auth_handler::LoginRequest,
            auth_handler::AuthResponse,
            TokenResponse,
            // User handler types
            user_handler::AddFavoriteRequest,
            user_handler::ProfileResponse,
            // Recipe handler types
            recipe_handler::LikeToggleResponse,
            MessageResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Users", description = "Registration, login, profile and favorites"),
        (name = "Recipes", description = "Recipe catalog and likes")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT token obtained from /api/users/login"))
                        .build(),
                ),
            );
        }
    }
}
