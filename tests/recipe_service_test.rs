//! Recipe service unit tests.

use std::sync::Arc;

use chrono::Utc;
use mockall::predicate::eq;
use uuid::Uuid;

use tastebook::domain::{Difficulty, NewRecipe, Recipe, RecipeFilter, RecipeOwner, RecipePatch};
use tastebook::errors::AppError;
use tastebook::infra::repositories::{MockRecipeRepository, MockUserRepository};
use tastebook::infra::{RecipeRepository, UnitOfWork, UserRepository};
use tastebook::services::{RecipeManager, RecipeService};

fn create_test_recipe(id: Uuid, owner_id: Uuid) -> Recipe {
    Recipe {
        id,
        title: "Shakshuka".to_string(),
        description: "Eggs poached in spiced tomato sauce".to_string(),
        image_url: "https://example.com/shakshuka.jpg".to_string(),
        cooking_time: 25,
        difficulty: Difficulty::Easy,
        ingredients: vec!["4 eggs".to_string(), "400g tomatoes".to_string()],
        instructions: "Simmer the sauce, crack in the eggs, cover.".to_string(),
        owner: RecipeOwner {
            id: owner_id,
            username: "chef_anna".to_string(),
        },
        likes: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn valid_new_recipe() -> NewRecipe {
    NewRecipe {
        title: "Shakshuka".to_string(),
        description: "Eggs poached in spiced tomato sauce".to_string(),
        image_url: "https://example.com/shakshuka.jpg".to_string(),
        cooking_time: 25,
        difficulty: Difficulty::Easy,
        ingredients: vec!["4 eggs".to_string()],
        instructions: "Simmer the sauce, crack in the eggs, cover.".to_string(),
    }
}

/// Test mock for UnitOfWork that wraps mockall repositories
struct TestUnitOfWork {
    user_repo: Arc<MockUserRepository>,
    recipe_repo: Arc<MockRecipeRepository>,
}

impl TestUnitOfWork {
    fn new(recipe_repo: MockRecipeRepository) -> Self {
        Self {
            user_repo: Arc::new(MockUserRepository::new()),
            recipe_repo: Arc::new(recipe_repo),
        }
    }
}

impl UnitOfWork for TestUnitOfWork {
    fn users(&self) -> Arc<dyn UserRepository> {
        self.user_repo.clone()
    }

    fn recipes(&self) -> Arc<dyn RecipeRepository> {
        self.recipe_repo.clone()
    }
}

#[tokio::test]
async fn test_create_recipe_success() {
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_create()
        .returning(move |owner, _| Ok(create_test_recipe(Uuid::new_v4(), owner)));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.create_recipe(owner_id, valid_new_recipe()).await;

    assert!(result.is_ok());
    assert_eq!(result.unwrap().owner.id, owner_id);
}

#[tokio::test]
async fn test_create_recipe_invalid_never_reaches_repository() {
    let mut invalid = valid_new_recipe();
    invalid.cooking_time = 0;

    // No expectations registered: any repository call would panic.
    let repo = MockRecipeRepository::new();
    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));

    let result = service.create_recipe(Uuid::new_v4(), invalid).await;
    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_get_recipe_not_found() {
    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.get_recipe(Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_list_recipes_passes_filter() {
    let filter = RecipeFilter::from_query(Some("Easy"), None, None).unwrap();

    let mut repo = MockRecipeRepository::new();
    repo.expect_list()
        .with(eq(filter.clone()))
        .returning(|_| Ok(vec![]));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.list_recipes(filter).await;

    assert!(result.is_ok());
    assert!(result.unwrap().is_empty());
}

#[tokio::test]
async fn test_update_recipe_success() {
    let recipe_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .with(eq(recipe_id))
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));
    repo.expect_update().returning(move |id, _| {
        let mut updated = create_test_recipe(id, owner_id);
        updated.title = "Green Shakshuka".to_string();
        Ok(updated)
    });

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service
        .update_recipe(owner_id, recipe_id, RecipePatch::title("Green Shakshuka"))
        .await;

    assert_eq!(result.unwrap().title, "Green Shakshuka");
}

#[tokio::test]
async fn test_update_recipe_forbidden_for_non_owner() {
    let recipe_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();
    let intruder_id = Uuid::new_v4();

    // Only the lookup is expected; an update call would panic the mock.
    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service
        .update_recipe(intruder_id, recipe_id, RecipePatch::title("Stolen"))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}

#[tokio::test]
async fn test_update_missing_recipe_is_not_found_even_for_stranger() {
    // Existence is reported before ownership: a missing recipe is 404
    // for everyone, never 403.
    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id().returning(|_| Ok(None));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service
        .update_recipe(Uuid::new_v4(), Uuid::new_v4(), RecipePatch::title("x"))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_update_recipe_rejects_invalid_patch() {
    let recipe_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service
        .update_recipe(owner_id, recipe_id, RecipePatch::title("   "))
        .await;

    assert!(matches!(result.unwrap_err(), AppError::Validation(_)));
}

#[tokio::test]
async fn test_update_recipe_empty_patch_returns_unchanged() {
    let recipe_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service
        .update_recipe(owner_id, recipe_id, RecipePatch::default())
        .await;

    assert_eq!(result.unwrap().id, recipe_id);
}

#[tokio::test]
async fn test_delete_recipe_success() {
    let recipe_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));
    repo.expect_delete().with(eq(recipe_id)).returning(|_| Ok(()));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.delete_recipe(owner_id, recipe_id).await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_delete_recipe_forbidden_for_non_owner() {
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_find_by_id()
        .returning(move |id| Ok(Some(create_test_recipe(id, owner_id))));

    let service = RecipeManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let result = service.delete_recipe(Uuid::new_v4(), Uuid::new_v4()).await;

    assert!(matches!(result.unwrap_err(), AppError::Forbidden));
}
