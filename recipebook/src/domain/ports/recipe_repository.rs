//! Port for recipe persistence.

use async_trait::async_trait;
use futures_util::stream::BoxStream;

use crate::domain::{Recipe, UserId};

use super::RepositoryError;

/// Live snapshots of every recipe; see [`super::DocumentSnapshots`].
pub type RecipeFeed = BoxStream<'static, Result<Vec<Recipe>, RepositoryError>>;

/// Typed access to the `recipes` collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Fetch a recipe by id.
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, RepositoryError>;

    /// Create or fully overwrite the recipe keyed by `recipe.id`.
    async fn save(&self, recipe: &Recipe) -> Result<(), RepositoryError>;

    /// Delete a recipe. Irreversible.
    async fn delete(&self, id: &str) -> Result<(), RepositoryError>;

    /// Every recipe created by `creator`.
    async fn list_by_creator(&self, creator: &UserId) -> Result<Vec<Recipe>, RepositoryError>;

    /// Subscribe to the whole collection.
    fn watch_all(&self) -> RecipeFeed;
}
