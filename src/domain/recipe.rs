//! Recipe domain entity, difficulty enumeration, and patch type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Recipe difficulty levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<&str> for Difficulty {
    type Error = AppError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "Easy" => Ok(Difficulty::Easy),
            "Medium" => Ok(Difficulty::Medium),
            "Hard" => Ok(Difficulty::Hard),
            other => Err(AppError::validation(format!(
                "Difficulty must be Easy, Medium or Hard, got '{}'",
                other
            ))),
        }
    }
}

/// Owner summary embedded in a recipe (wire: `user: {_id, username}`)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RecipeOwner {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
}

/// Recipe domain entity.
///
/// The owner is recorded at creation and immutable afterwards. `likes`
/// holds each liker at most once; it is a projection of the unified
/// like relation, so it always agrees with users' favorites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    /// Cooking time in minutes, always positive
    pub cooking_time: i32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub owner: RecipeOwner,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recipe {
    /// Whether the given user currently likes this recipe
    pub fn liked_by(&self, user_id: Uuid) -> bool {
        self.likes.contains(&user_id)
    }
}

/// Field set for creating a recipe
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    #[schema(example = "Shakshuka")]
    pub title: String,
    #[schema(example = "Eggs poached in spiced tomato sauce")]
    pub description: String,
    #[schema(example = "https://example.com/shakshuka.jpg")]
    pub image_url: String,
    #[schema(example = 25)]
    pub cooking_time: i32,
    pub difficulty: Difficulty,
    #[schema(example = json!(["4 eggs", "400g tomatoes"]))]
    pub ingredients: Vec<String>,
    #[schema(example = "Simmer the sauce, crack in the eggs, cover.")]
    pub instructions: String,
}

impl NewRecipe {
    /// Validate all required fields before persistence.
    pub fn validate(&self) -> AppResult<()> {
        validate_title(&self.title)?;
        validate_description(&self.description)?;
        validate_image_url(&self.image_url)?;
        validate_cooking_time(self.cooking_time)?;
        validate_ingredients(&self.ingredients)?;
        validate_instructions(&self.instructions)?;
        Ok(())
    }
}

/// A single patch slot.
///
/// `None` = field omitted (keep the stored value), `Some(None)` = explicit
/// JSON null, `Some(Some(v))` = overwrite with `v`. Every recipe field is
/// mandatory, so the explicit-null state is never legal and is rejected by
/// [`RecipePatch::validate`] instead of being silently read as "keep".
pub type PatchField<T> = Option<Option<T>>;

fn patch_field<'de, T, D>(deserializer: D) -> Result<PatchField<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    // A present key always lands in the outer Some; serde(default)
    // covers the omitted case.
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial update for a recipe. Omitted fields keep their previous value.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub title: PatchField<String>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub description: PatchField<String>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub image_url: PatchField<String>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<i32>)]
    pub cooking_time: PatchField<i32>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<Difficulty>)]
    pub difficulty: PatchField<Difficulty>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<Vec<String>>)]
    pub ingredients: PatchField<Vec<String>>,
    #[serde(default, deserialize_with = "patch_field")]
    #[schema(value_type = Option<String>)]
    pub instructions: PatchField<String>,
}

impl RecipePatch {
    /// Build a patch that sets a single field (test and internal helper)
    pub fn title(value: impl Into<String>) -> Self {
        Self {
            title: Some(Some(value.into())),
            ..Self::default()
        }
    }

    /// Validate every present field; explicit nulls are rejected.
    pub fn validate(&self) -> AppResult<()> {
        let title = present(&self.title, "title")?;
        let description = present(&self.description, "description")?;
        let image_url = present(&self.image_url, "imageUrl")?;
        let cooking_time = present(&self.cooking_time, "cookingTime")?;
        present(&self.difficulty, "difficulty")?;
        let ingredients = present(&self.ingredients, "ingredients")?;
        let instructions = present(&self.instructions, "instructions")?;

        if let Some(v) = title {
            validate_title(v)?;
        }
        if let Some(v) = description {
            validate_description(v)?;
        }
        if let Some(v) = image_url {
            validate_image_url(v)?;
        }
        if let Some(v) = cooking_time {
            validate_cooking_time(*v)?;
        }
        if let Some(v) = ingredients {
            validate_ingredients(v)?;
        }
        if let Some(v) = instructions {
            validate_instructions(v)?;
        }
        Ok(())
    }

    /// Whether the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.image_url.is_none()
            && self.cooking_time.is_none()
            && self.difficulty.is_none()
            && self.ingredients.is_none()
            && self.instructions.is_none()
    }
}

/// Flatten a patch slot, failing on the explicit-null state.
fn present<'a, T>(field: &'a PatchField<T>, name: &str) -> AppResult<Option<&'a T>> {
    match field {
        None => Ok(None),
        Some(None) => Err(AppError::validation(format!(
            "{} cannot be cleared",
            name
        ))),
        Some(Some(v)) => Ok(Some(v)),
    }
}

fn validate_title(title: &str) -> AppResult<()> {
    if title.trim().is_empty() {
        return Err(AppError::validation("Title is required"));
    }
    Ok(())
}

fn validate_description(description: &str) -> AppResult<()> {
    if description.trim().is_empty() {
        return Err(AppError::validation("Description is required"));
    }
    Ok(())
}

fn validate_image_url(image_url: &str) -> AppResult<()> {
    if image_url.trim().is_empty() {
        return Err(AppError::validation("Image URL is required"));
    }
    Ok(())
}

fn validate_cooking_time(minutes: i32) -> AppResult<()> {
    if minutes <= 0 {
        return Err(AppError::validation(
            "Cooking time must be a positive number of minutes",
        ));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[String]) -> AppResult<()> {
    if ingredients.is_empty() {
        return Err(AppError::validation("At least one ingredient is required"));
    }
    if ingredients.iter().any(|i| i.trim().is_empty()) {
        return Err(AppError::validation("Ingredients cannot be empty"));
    }
    Ok(())
}

fn validate_instructions(instructions: &str) -> AppResult<()> {
    if instructions.trim().is_empty() {
        return Err(AppError::validation("Instructions are required"));
    }
    Ok(())
}

/// Outcome of flipping a like: the acting user's resulting membership and
/// the full liker set after the flip.
#[derive(Debug, Clone)]
pub struct LikeState {
    pub liked_by_user: bool,
    pub likes: Vec<Uuid>,
}

impl LikeState {
    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

/// Recipe response matching the wire contract (camelCase, Mongo-style `_id`).
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub cooking_time: i32,
    pub difficulty: Difficulty,
    pub ingredients: Vec<String>,
    pub instructions: String,
    pub user: RecipeOwner,
    pub likes: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            title: recipe.title,
            description: recipe.description,
            image_url: recipe.image_url,
            cooking_time: recipe.cooking_time,
            difficulty: recipe.difficulty,
            ingredients: recipe.ingredients,
            instructions: recipe.instructions,
            user: recipe.owner,
            likes: recipe.likes,
            created_at: recipe.created_at,
            updated_at: recipe.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_new_recipe() -> NewRecipe {
        NewRecipe {
            title: "Shakshuka".to_string(),
            description: "Eggs poached in spiced tomato sauce".to_string(),
            image_url: "https://example.com/shakshuka.jpg".to_string(),
            cooking_time: 25,
            difficulty: Difficulty::Easy,
            ingredients: vec!["4 eggs".to_string(), "400g tomatoes".to_string()],
            instructions: "Simmer the sauce, crack in the eggs, cover.".to_string(),
        }
    }

    #[test]
    fn test_new_recipe_valid() {
        assert!(valid_new_recipe().validate().is_ok());
    }

    #[test]
    fn test_new_recipe_rejects_zero_cooking_time() {
        let mut recipe = valid_new_recipe();
        recipe.cooking_time = 0;
        assert!(matches!(
            recipe.validate().unwrap_err(),
            AppError::Validation(_)
        ));
    }

    #[test]
    fn test_new_recipe_rejects_empty_ingredients() {
        let mut recipe = valid_new_recipe();
        recipe.ingredients.clear();
        assert!(recipe.validate().is_err());

        let mut recipe = valid_new_recipe();
        recipe.ingredients = vec!["  ".to_string()];
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_new_recipe_rejects_blank_title() {
        let mut recipe = valid_new_recipe();
        recipe.title = "   ".to_string();
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_difficulty_parse() {
        assert_eq!(Difficulty::try_from("Easy").unwrap(), Difficulty::Easy);
        assert_eq!(Difficulty::try_from("Hard").unwrap(), Difficulty::Hard);
        assert!(Difficulty::try_from("Impossible").is_err());
    }

    #[test]
    fn test_patch_omitted_field_is_kept() {
        let patch: RecipePatch = serde_json::from_str(r#"{"title": "New title"}"#).unwrap();
        assert_eq!(patch.title, Some(Some("New title".to_string())));
        assert!(patch.description.is_none());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_patch_explicit_null_is_rejected() {
        let patch: RecipePatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(patch.title, Some(None));
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_patch_present_field_is_validated() {
        let patch: RecipePatch = serde_json::from_str(r#"{"cookingTime": -5}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn test_empty_patch() {
        let patch: RecipePatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
