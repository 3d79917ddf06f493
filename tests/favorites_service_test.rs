//! Favorites service unit tests.
//!
//! The like relation is emulated with an in-memory set behind the
//! repository mock, so the toggle/add/remove semantics can be exercised
//! without a database.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use uuid::Uuid;

use tastebook::domain::{Difficulty, LikeState, Recipe, RecipeOwner};
use tastebook::errors::AppError;
use tastebook::infra::repositories::{MockRecipeRepository, MockUserRepository};
use tastebook::infra::{RecipeRepository, UnitOfWork, UserRepository};
use tastebook::services::{FavoritesManager, FavoritesService};

fn create_test_recipe(id: Uuid, owner_id: Uuid) -> Recipe {
    Recipe {
        id,
        title: "Miso Ramen".to_string(),
        description: "Rich broth with miso tare".to_string(),
        image_url: "https://example.com/ramen.jpg".to_string(),
        cooking_time: 90,
        difficulty: Difficulty::Hard,
        ingredients: vec!["noodles".to_string(), "miso".to_string()],
        instructions: "Simmer the broth, season, assemble.".to_string(),
        owner: RecipeOwner {
            id: owner_id,
            username: "noodle_nerd".to_string(),
        },
        likes: vec![],
        created_at: Utc::now(),
        updated_at: Utc::now(),
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

/// Repository mock whose like primitives share an in-memory like set.
fn repo_with_like_set(recipe_id: Uuid, owner_id: Uuid) -> MockRecipeRepository {
    let likes: Arc<Mutex<HashSet<Uuid>>> = Arc::new(Mutex::new(HashSet::new()));
    let mut repo = MockRecipeRepository::new();

    repo.expect_find_by_id()
        .returning(move |id| {
            if id == recipe_id {
                Ok(Some(create_test_recipe(id, owner_id)))
            } else {
                Ok(None)
            }
        });

    let set = likes.clone();
    repo.expect_toggle_like().returning(move |_, user_id| {
        let mut set = set.lock().unwrap();
        let liked_by_user = if set.contains(&user_id) {
            set.remove(&user_id);
            false
        } else {
            set.insert(user_id);
            true
        };
        Ok(LikeState {
            liked_by_user,
            likes: set.iter().copied().collect(),
        })
    });

    let set = likes.clone();
    repo.expect_insert_like()
        .returning(move |_, user_id| Ok(set.lock().unwrap().insert(user_id)));

    let set = likes;
    repo.expect_remove_like().returning(move |_, user_id| {
        set.lock().unwrap().remove(&user_id);
        Ok(())
    });

    repo
}

#[tokio::test]
async fn test_toggle_like_is_involutive() {
    let recipe_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let repo = repo_with_like_set(recipe_id, Uuid::new_v4());
    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));

    let first = service.toggle_like(recipe_id, user_id).await.unwrap();
    assert!(first.liked_by_user);
    assert_eq!(first.like_count(), 1);

    let second = service.toggle_like(recipe_id, user_id).await.unwrap();
    assert!(!second.liked_by_user);
    assert_eq!(second.like_count(), 0);
}

#[tokio::test]
async fn test_toggle_like_missing_recipe_not_found() {
    let repo = repo_with_like_set(Uuid::new_v4(), Uuid::new_v4());
    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));

    let result = service.toggle_like(Uuid::new_v4(), Uuid::new_v4()).await;
    assert!(matches!(result.unwrap_err(), AppError::NotFound));
}

#[tokio::test]
async fn test_add_favorite_twice_conflicts() {
    let recipe_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let repo = repo_with_like_set(recipe_id, Uuid::new_v4());
    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));

    assert!(service.add_favorite(recipe_id, user_id).await.is_ok());

    let second = service.add_favorite(recipe_id, user_id).await;
    assert!(matches!(second.unwrap_err(), AppError::Conflict(_)));
}

#[tokio::test]
async fn test_remove_favorite_is_idempotent() {
    let recipe_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let repo = repo_with_like_set(recipe_id, Uuid::new_v4());
    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));

    service.add_favorite(recipe_id, user_id).await.unwrap();
    assert!(service.remove_favorite(recipe_id, user_id).await.is_ok());

    // Removing again is still a success, not an error.
    assert!(service.remove_favorite(recipe_id, user_id).await.is_ok());
}

#[tokio::test]
async fn test_favorite_then_toggle_unlikes() {
    // A favorite added from the profile page and a like toggled on the
    // recipe page are the same relation.
    let recipe_id = Uuid::new_v4();
    let user_id = Uuid::new_v4();

    let repo = repo_with_like_set(recipe_id, Uuid::new_v4());
    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));

    service.add_favorite(recipe_id, user_id).await.unwrap();

    let state = service.toggle_like(recipe_id, user_id).await.unwrap();
    assert!(!state.liked_by_user);
    assert_eq!(state.like_count(), 0);
}

#[tokio::test]
async fn test_favorites_for_lists_liked_recipes() {
    let user_id = Uuid::new_v4();
    let owner_id = Uuid::new_v4();

    let mut repo = MockRecipeRepository::new();
    repo.expect_list_liked_by().returning(move |_| {
        Ok(vec![
            create_test_recipe(Uuid::new_v4(), owner_id),
            create_test_recipe(Uuid::new_v4(), owner_id),
        ])
    });

    let service = FavoritesManager::new(Arc::new(TestUnitOfWork::new(repo)));
    let favorites = service.favorites_for(user_id).await.unwrap();

    assert_eq!(favorites.len(), 2);
}
