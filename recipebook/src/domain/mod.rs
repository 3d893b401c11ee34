//! Domain primitives, records and ports.
//!
//! Purpose: define the records exchanged with the document store, the pure
//! rules the workflows apply to user input (blank checks, draft validation,
//! delimiter splitting, feed filtering) and the capability interfaces the
//! state holders depend on. Nothing here performs I/O.
//!
//! Public surface:
//! - Error / ErrorCode: workflow failure carried into error states.
//! - Recipe / User: document records with default-valued fields.
//! - RecipeDraft: add/edit form contents and their validation order.
//! - RecipeFilter / CategoryFilter: feed projection inputs.
//! - LoginCredentials / Registration / Session / AuthFailure: auth inputs,
//!   caller identity and provider error classification.
//! - ports: capability traits implemented by [`crate::outbound`].

pub mod auth;
pub mod category;
pub mod draft;
pub mod error;
pub mod filter;
pub mod image;
pub mod ports;
pub mod preferences;
pub mod recipe;
pub mod user;

pub use self::auth::{
    AuthFailure, CredentialsValidationError, LOGIN_FIELDS_REQUIRED, LoginCredentials,
    ProfileChange, REGISTRATION_FIELDS_REQUIRED, Registration, Session,
};
pub use self::category::{ALL_CATEGORIES, CATEGORIES, CategoryFilter, filter_labels};
pub use self::draft::{
    DraftValidationError, RecipeDraft, is_web_url, join_ingredients, join_steps,
    split_ingredients, split_steps,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::filter::{RecipeFilter, filter_by_category, filter_by_query, title_contains};
pub use self::image::{DEFAULT_IMAGE_SERVICE_URL, ImageUrlTemplate};
pub use self::preferences::{
    DARK_THEME_DEFAULT, DARK_THEME_KEY, LocalPreferences, REMEMBER_ME_DEFAULT, REMEMBER_ME_KEY,
    StartDestination,
};
pub use self::recipe::{Recipe, new_recipe_id};
pub use self::user::{FALLBACK_USER_NAME, User, UserId, UserValidationError};

/// Result alias used by every workflow operation.
///
/// # Examples
/// ```
/// use recipebook::domain::{AppResult, Error};
///
/// fn guard(busy: bool) -> AppResult<()> {
///     if busy { Err(Error::busy()) } else { Ok(()) }
/// }
/// assert!(guard(true).unwrap_err().is_busy());
/// ```
pub type AppResult<T> = Result<T, Error>;
