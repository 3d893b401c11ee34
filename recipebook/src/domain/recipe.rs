//! Recipe data model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::UserId;

/// Generate a fresh recipe identifier.
///
/// Identifiers are random UUID v4 strings assigned once, on first save.
pub fn new_recipe_id() -> String {
    Uuid::new_v4().to_string()
}

/// Recipe document stored in the `recipes` collection.
///
/// ## Invariants
/// - `id` is assigned on first save and never changes afterwards.
/// - `creator_id` is set from the authenticated caller and never changes.
/// - `steps_list` order is meaningful; it is rendered as numbered steps.
///
/// Missing fields deserialize to defaults, matching documents written by
/// older clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipe {
    /// Document key.
    pub id: String,
    /// Soft reference to the owning [`super::User`].
    pub creator_id: String,
    /// Recipe name.
    pub title: String,
    /// Ordered ingredient lines.
    pub ingredients_list: Vec<String>,
    /// Ordered instruction steps.
    pub steps_list: Vec<String>,
    /// Category label; see [`super::CATEGORIES`].
    pub category: String,
    /// Optional video link.
    pub video_url: Option<String>,
    /// Optional cover image link.
    pub image_url: Option<String>,
}

impl Recipe {
    /// Whether the recipe belongs to the given session user.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::{Recipe, UserId};
    ///
    /// let recipe = Recipe { creator_id: "u1".into(), ..Recipe::default() };
    /// let owner = UserId::new("u1").unwrap();
    /// assert!(recipe.is_owned_by(Some(&owner)));
    /// assert!(!recipe.is_owned_by(None));
    /// ```
    pub fn is_owned_by(&self, user_id: Option<&UserId>) -> bool {
        user_id.is_some_and(|id| id.as_ref() == self.creator_id)
    }
}
