//! `RecipeRepository` over a generic document store.

use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde_json::Value;
use tracing::warn;

use crate::domain::Recipe;
use crate::domain::UserId;
use crate::domain::ports::{Collection, DocumentStore, RecipeFeed, RecipeRepository, RepositoryError};

use super::{decode, decode_all, encode};

/// Recipes stored as JSON documents in the `recipes` collection.
#[derive(Clone)]
pub struct DocumentRecipeRepository {
    store: Arc<dyn DocumentStore>,
}

impl DocumentRecipeRepository {
    /// Wrap a document store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl RecipeRepository for DocumentRecipeRepository {
    async fn find_by_id(&self, id: &str) -> Result<Option<Recipe>, RepositoryError> {
        let document = self
            .store
            .get(Collection::Recipes, id)
            .await
            .map_err(RepositoryError::from_read)?;
        document.map(decode::<Recipe>).transpose()
    }

    async fn save(&self, recipe: &Recipe) -> Result<(), RepositoryError> {
        let document = encode(recipe)?;
        self.store
            .set(Collection::Recipes, &recipe.id, document)
            .await
            .map_err(RepositoryError::from_write)
    }

    async fn delete(&self, id: &str) -> Result<(), RepositoryError> {
        self.store
            .delete(Collection::Recipes, id)
            .await
            .map_err(RepositoryError::from_write)
    }

    async fn list_by_creator(&self, creator: &UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let documents = self
            .store
            .query_equal(
                Collection::Recipes,
                "creatorId",
                &Value::String(creator.to_string()),
            )
            .await
            .map_err(RepositoryError::from_read)?;
        Ok(decode_all(documents))
    }

    fn watch_all(&self) -> RecipeFeed {
        self.store
            .subscribe(Collection::Recipes)
            .map(|snapshot| match snapshot {
                Ok(documents) => Ok(decode_all(documents)),
                Err(err) => {
                    warn!(error = %err, "recipe snapshot failed");
                    Err(RepositoryError::from_read(err))
                }
            })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use futures_util::stream;
    use rstest::rstest;
    use serde_json::json;

    use crate::domain::ports::{DocumentStoreError, MockDocumentStore};

    fn repo(store: MockDocumentStore) -> DocumentRecipeRepository {
        DocumentRecipeRepository::new(Arc::new(store))
    }

    #[rstest]
    #[tokio::test]
    async fn find_decodes_camel_case_documents() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .withf(|collection, id| *collection == Collection::Recipes && id == "r1")
            .times(1)
            .return_once(|_, _| {
                Ok(Some(json!({
                    "id": "r1",
                    "creatorId": "u1",
                    "title": "Tea",
                    "ingredientsList": ["tea", "water"],
                })))
            });
        let recipe = repo(store)
            .find_by_id("r1")
            .await
            .expect("find")
            .expect("present");
        assert_eq!(recipe.creator_id, "u1");
        assert_eq!(recipe.ingredients_list, vec!["tea", "water"]);
        assert!(recipe.steps_list.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_document_is_a_decode_error() {
        let mut store = MockDocumentStore::new();
        store
            .expect_get()
            .return_once(|_, _| Ok(Some(json!({"title": 42}))));
        let err = repo(store).find_by_id("r1").await.expect_err("decode");
        assert!(matches!(err, RepositoryError::Decode { .. }));
    }

    #[rstest]
    #[tokio::test]
    async fn save_writes_full_document_under_recipe_id() {
        let mut store = MockDocumentStore::new();
        store
            .expect_set()
            .withf(|collection, id, document| {
                *collection == Collection::Recipes
                    && id == "r9"
                    && document["creatorId"] == "u1"
                    && document["stepsList"] == json!(["Boil"])
            })
            .times(1)
            .return_once(|_, _, _| Ok(()));
        let recipe = Recipe {
            id: "r9".into(),
            creator_id: "u1".into(),
            steps_list: vec!["Boil".into()],
            ..Recipe::default()
        };
        repo(store).save(&recipe).await.expect("save");
    }

    #[rstest]
    #[tokio::test]
    async fn write_failures_map_to_write_errors() {
        let mut store = MockDocumentStore::new();
        store
            .expect_delete()
            .return_once(|_, _| Err(DocumentStoreError::connection("offline")));
        let err = repo(store).delete("r1").await.expect_err("offline");
        assert!(matches!(err, RepositoryError::Write { .. }));
        assert!(err.to_string().contains("offline"));
    }

    #[rstest]
    #[tokio::test]
    async fn feed_skips_malformed_documents_and_forwards_errors() {
        let mut store = MockDocumentStore::new();
        store.expect_subscribe().return_once(|_| {
            stream::iter(vec![
                Ok(vec![json!({"id": "r1", "title": "Tea"}), json!("junk")]),
                Err(DocumentStoreError::query("listener detached")),
            ])
            .boxed()
        });
        let mut feed = repo(store).watch_all();
        let first = feed.next().await.expect("first").expect("ok");
        assert_eq!(first.len(), 1);
        let second = feed.next().await.expect("second");
        assert!(matches!(second, Err(RepositoryError::Read { .. })));
    }
}
