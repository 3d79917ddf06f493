//! Integration tests for API wire shapes and error mapping.
//!
//! These tests exercise the serialized response contracts and the error
//! taxonomy without requiring database or Redis connections.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use tastebook::domain::{
    Difficulty, Recipe, RecipeFilter, RecipeOwner, RecipePatch, RecipeResponse, TimeBucket,
};
use tastebook::errors::AppError;
use tastebook::services::Claims;
use tastebook::types::MessageResponse;

fn sample_recipe() -> Recipe {
    Recipe {
        id: Uuid::new_v4(),
        title: "Shakshuka".to_string(),
        description: "Eggs poached in spiced tomato sauce".to_string(),
        image_url: "https://example.com/shakshuka.jpg".to_string(),
        cooking_time: 25,
        difficulty: Difficulty::Easy,
        ingredients: vec!["4 eggs".to_string(), "400g tomatoes".to_string()],
        instructions: "Simmer the sauce, crack in the eggs, cover.".to_string(),
        owner: RecipeOwner {
            id: Uuid::new_v4(),
            username: "chef_anna".to_string(),
        },
        likes: vec![Uuid::new_v4()],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// =============================================================================
// Error Mapping Tests
// =============================================================================

#[tokio::test]
async fn test_error_status_codes() {
    assert_eq!(
        AppError::NotFound.into_response().status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        AppError::Unauthorized.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::Forbidden.into_response().status(),
        StatusCode::FORBIDDEN
    );
    assert_eq!(
        AppError::InvalidCredentials.into_response().status(),
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        AppError::conflict("Favorite").into_response().status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        AppError::validation("Title is required")
            .into_response()
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert_eq!(
        AppError::internal("boom").into_response().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_unauthorized_and_forbidden_stay_distinct() {
    // "log in" and "not allowed" must never collapse into one signal
    let unauthorized = AppError::Unauthorized.into_response().status();
    let forbidden = AppError::Forbidden.into_response().status();
    assert_ne!(unauthorized, forbidden);
}

#[tokio::test]
async fn test_internal_error_hides_details() {
    use http_body_util::BodyExt;

    let response = AppError::internal("connection pool exhausted at 10.0.0.3").into_response();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    let message = body["error"]["message"].as_str().unwrap();
    assert!(!message.contains("10.0.0.3"));
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

// =============================================================================
// Wire Shape Tests
// =============================================================================

#[tokio::test]
async fn test_recipe_response_wire_shape() {
    let recipe = sample_recipe();
    let owner_id = recipe.owner.id;
    let value = serde_json::to_value(RecipeResponse::from(recipe)).unwrap();

    // Mongo-style _id and camelCase keys
    assert!(value.get("_id").is_some());
    assert!(value.get("imageUrl").is_some());
    assert!(value.get("cookingTime").is_some());
    assert!(value.get("createdAt").is_some());
    assert!(value.get("id").is_none());
    assert!(value.get("image_url").is_none());

    // Owner summary is nested under "user"
    assert_eq!(value["user"]["_id"], json!(owner_id));
    assert_eq!(value["user"]["username"], "chef_anna");

    assert_eq!(value["likes"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_recipe_response_never_leaks_owner_credentials() {
    let value = serde_json::to_value(RecipeResponse::from(sample_recipe())).unwrap();
    assert!(value["user"].get("email").is_none());
    assert!(value["user"].get("passwordHash").is_none());
}

#[tokio::test]
async fn test_message_response_shape() {
    let value = serde_json::to_value(MessageResponse::new("Recipe deleted")).unwrap();
    assert_eq!(value, json!({"message": "Recipe deleted"}));
}

#[tokio::test]
async fn test_claims_structure() {
    let claims = Claims {
        sub: Uuid::new_v4(),
        username: "chef_anna".to_string(),
        email: "anna@example.com".to_string(),
        exp: Utc::now().timestamp() + 3600,
        iat: Utc::now().timestamp(),
    };

    assert!(!claims.username.is_empty());
    assert!(claims.exp > claims.iat);
}

// =============================================================================
// Request Parsing Tests
// =============================================================================

#[tokio::test]
async fn test_patch_deserialization_distinguishes_omitted_and_null() {
    let patch: RecipePatch = serde_json::from_str(r#"{"title": "New"}"#).unwrap();
    assert_eq!(patch.title, Some(Some("New".to_string())));
    assert_eq!(patch.description, None);
    assert!(patch.validate().is_ok());

    let patch: RecipePatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
    assert_eq!(patch.title, Some(None));
    assert!(patch.validate().is_err());
}

#[tokio::test]
async fn test_patch_camel_case_keys() {
    let patch: RecipePatch =
        serde_json::from_str(r#"{"imageUrl": "https://example.com/x.jpg", "cookingTime": 45}"#)
            .unwrap();

    assert_eq!(
        patch.image_url,
        Some(Some("https://example.com/x.jpg".to_string()))
    );
    assert_eq!(patch.cooking_time, Some(Some(45)));
}

#[tokio::test]
async fn test_filter_accepts_frontend_sentinels() {
    let filter =
        RecipeFilter::from_query(Some("All Difficulties"), Some("Any Time"), None).unwrap();
    assert!(filter.difficulty.is_none());
    assert!(filter.time.is_none());

    let filter =
        RecipeFilter::from_query(Some("Hard"), Some("Over 60 min"), Some("ramen")).unwrap();
    assert_eq!(filter.difficulty, Some(Difficulty::Hard));
    assert_eq!(filter.time, Some(TimeBucket::Over60));
    assert_eq!(filter.search.as_deref(), Some("ramen"));
}

#[tokio::test]
async fn test_filter_rejects_unknown_values_as_bad_request() {
    let err = RecipeFilter::from_query(Some("Impossible"), None, None).unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);

    let err = RecipeFilter::from_query(None, Some("90 min"), None).unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
}
