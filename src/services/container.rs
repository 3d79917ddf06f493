//! Service Container - Centralized service access with parallel execution support.
//!
//! SOLID (SRP): Manages service lifecycle and access.
//! SOLID (DIP): Depends on service traits, not implementations.

use std::future::Future;
use std::sync::Arc;

use super::{AuthService, FavoritesService, RecipeService, UserService};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::Persistence;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get user service
    fn users(&self) -> Arc<dyn UserService>;

    /// Get recipe service
    fn recipes(&self) -> Arc<dyn RecipeService>;

    /// Get favorites service
    fn favorites(&self) -> Arc<dyn FavoritesService>;
}

/// Concrete implementation of ServiceContainer
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    recipe_service: Arc<dyn RecipeService>,
    favorites_service: Arc<dyn FavoritesService>,
}

impl Services {
    /// Create a new service container with all services initialized
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        user_service: Arc<dyn UserService>,
        recipe_service: Arc<dyn RecipeService>,
        favorites_service: Arc<dyn FavoritesService>,
    ) -> Self {
        Self {
            auth_service,
            user_service,
            recipe_service,
            favorites_service,
        }
    }

    /// Create service container from database connection and config
    pub fn from_connection(db: sea_orm::DatabaseConnection, config: Config) -> Self {
        use super::{Authenticator, FavoritesManager, RecipeManager, UserManager};

        let uow = Arc::new(Persistence::new(db));
        let auth_service = Arc::new(Authenticator::new(uow.clone(), config));
        let user_service = Arc::new(UserManager::new(uow.clone()));
        let recipe_service = Arc::new(RecipeManager::new(uow.clone()));
        let favorites_service = Arc::new(FavoritesManager::new(uow));

        Self {
            auth_service,
            user_service,
            recipe_service,
            favorites_service,
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn recipes(&self) -> Arc<dyn RecipeService> {
        self.recipe_service.clone()
    }

    fn favorites(&self) -> Arc<dyn FavoritesService> {
        self.favorites_service.clone()
    }
}

/// Parallel execution utilities for running independent operations concurrently.
pub mod parallel {
    use super::*;
    use tokio::try_join;

    /// Execute two independent async operations in parallel.
    ///
    /// Both operations run concurrently and the function returns when both
    /// complete. If either operation fails, the error is returned immediately.
    ///
    /// # Example
    /// ```ignore
    /// let (user, favorites) = parallel::join2(
    ///     services.users().get_user(id),
    ///     services.favorites().favorites_for(id),
    /// ).await?;
    /// ```
    pub async fn join2<F1, F2, T1, T2>(f1: F1, f2: F2) -> AppResult<(T1, T2)>
    where
        F1: Future<Output = AppResult<T1>>,
        F2: Future<Output = AppResult<T2>>,
    {
        try_join!(f1, f2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_parallel_join2() {
        async fn op1() -> AppResult<i32> {
            Ok(1)
        }
        async fn op2() -> AppResult<i32> {
            Ok(2)
        }

        let (a, b) = parallel::join2(op1(), op2()).await.unwrap();
        assert_eq!(a, 1);
        assert_eq!(b, 2);
    }

    #[tokio::test]
    async fn test_parallel_join2_propagates_error() {
        async fn ok_op() -> AppResult<i32> {
            Ok(1)
        }
        async fn failing_op() -> AppResult<i32> {
            Err(crate::errors::AppError::NotFound)
        }

        let result = parallel::join2(ok_op(), failing_op()).await;
        assert!(matches!(result, Err(crate::errors::AppError::NotFound)));
    }
}
