//! Editable recipe form contents and the rules that turn them into a
//! [`Recipe`].
//!
//! Ingredients and steps are edited as single text blobs. They are split into
//! ordered lists on save and flattened back into text on load; one
//! save → load → save cycle leaves the lists unchanged.

use std::sync::OnceLock;

use regex::Regex;

use super::{ImageUrlTemplate, Recipe, UserId};

/// Rule violations reported by [`RecipeDraft::validate`], in check order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DraftValidationError {
    /// Title was blank.
    #[error("Recipe name is required")]
    MissingTitle,
    /// Ingredients text was blank.
    #[error("Ingredients are required")]
    MissingIngredients,
    /// Steps text was blank.
    #[error("Instructions are required")]
    MissingSteps,
    /// No category selected.
    #[error("Please select a category")]
    MissingCategory,
    /// A video URL was supplied but does not look like a web URL.
    #[error("Please enter a valid video URL")]
    InvalidVideoUrl,
}

static WEB_URL_RE: OnceLock<Regex> = OnceLock::new();

fn web_url_regex() -> &'static Regex {
    WEB_URL_RE.get_or_init(|| {
        // Optional scheme and userinfo, dotted host with alphabetic TLD or an
        // IPv4 address, optional port, optional path/query/fragment.
        let pattern = r"(?i)^(?:(?:https?|rtsp)://)?(?:[^\s@/]+@)?(?:(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z]{2,63}|\d{1,3}(?:\.\d{1,3}){3})(?::\d{1,5})?(?:[/?#]\S*)?$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("web URL regex failed to compile: {error}"))
    })
}

/// Loose web URL check used for video links.
///
/// # Examples
/// ```
/// use recipebook::domain::is_web_url;
///
/// assert!(is_web_url("https://www.youtube.com/watch?v=abc"));
/// assert!(is_web_url("youtu.be/abc"));
/// assert!(!is_web_url("not a url"));
/// ```
///
/// # Panics
///
/// Panics on first use if the built-in URL pattern fails to compile. The
/// pattern is a constant exercised by this module's tests.
pub fn is_web_url(candidate: &str) -> bool {
    web_url_regex().is_match(candidate.trim())
}

fn trimmed_fragments<'a>(parts: impl Iterator<Item = &'a str>) -> Vec<String> {
    parts
        .map(str::trim)
        .filter(|fragment| !fragment.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Split ingredient text on commas, trimming and dropping empty fragments.
///
/// # Examples
/// ```
/// use recipebook::domain::split_ingredients;
///
/// assert_eq!(split_ingredients("flour, sugar,  eggs ,"), vec!["flour", "sugar", "eggs"]);
/// ```
pub fn split_ingredients(text: &str) -> Vec<String> {
    trimmed_fragments(text.split(','))
}

/// Split step text on commas and newlines, trimming and dropping empty
/// fragments, so runs of separators never produce blank steps.
///
/// # Examples
/// ```
/// use recipebook::domain::split_steps;
///
/// assert_eq!(split_steps("Mix,\n Rest,, Fry"), vec!["Mix", "Rest", "Fry"]);
/// ```
pub fn split_steps(text: &str) -> Vec<String> {
    trimmed_fragments(text.split([',', '\n']))
}

/// Flatten an ingredient list back into editable text.
pub fn join_ingredients(ingredients: &[String]) -> String {
    ingredients.join(", ")
}

/// Flatten a step list back into editable text, one step per line.
pub fn join_steps(steps: &[String]) -> String {
    steps.join("\n")
}

/// Raw contents of the add/edit form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Recipe name.
    pub title: String,
    /// Comma-delimited ingredients.
    pub ingredients: String,
    /// Comma- or newline-delimited steps.
    pub steps: String,
    /// Selected category.
    pub category: String,
    /// Optional video link; blank means none.
    pub video_url: String,
}

impl RecipeDraft {
    /// Populate the form from a stored recipe.
    pub fn from_recipe(recipe: &Recipe) -> Self {
        Self {
            title: recipe.title.clone(),
            ingredients: join_ingredients(&recipe.ingredients_list),
            steps: join_steps(&recipe.steps_list),
            category: recipe.category.clone(),
            video_url: recipe.video_url.clone().unwrap_or_default(),
        }
    }

    /// Check the rules in fixed order, reporting only the first failure.
    pub fn validate(&self) -> Result<(), DraftValidationError> {
        if self.title.trim().is_empty() {
            return Err(DraftValidationError::MissingTitle);
        }
        if self.ingredients.trim().is_empty() {
            return Err(DraftValidationError::MissingIngredients);
        }
        if self.steps.trim().is_empty() {
            return Err(DraftValidationError::MissingSteps);
        }
        if self.category.trim().is_empty() {
            return Err(DraftValidationError::MissingCategory);
        }
        if !self.video_url.trim().is_empty() && !is_web_url(&self.video_url) {
            return Err(DraftValidationError::InvalidVideoUrl);
        }
        Ok(())
    }

    /// Build the document to write. Call [`RecipeDraft::validate`] first.
    pub fn to_recipe(&self, id: String, creator: &UserId, images: &ImageUrlTemplate) -> Recipe {
        let video_url = self.video_url.trim();
        Recipe {
            id,
            creator_id: creator.to_string(),
            title: self.title.clone(),
            ingredients_list: split_ingredients(&self.ingredients),
            steps_list: split_steps(&self.steps),
            category: self.category.clone(),
            video_url: (!video_url.is_empty()).then(|| video_url.to_owned()),
            image_url: Some(images.for_title(&self.title)),
        }
    }
}
