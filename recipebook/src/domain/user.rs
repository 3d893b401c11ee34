//! User data model.
//!
//! A user document mirrors the identity issued by the auth capability. The
//! `id` is never generated locally.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Session;

/// Validation errors returned by [`UserId::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    /// The identifier was empty.
    #[error("user id must not be empty")]
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    #[error("user id must not contain surrounding whitespace")]
    InvalidId,
}

/// Identifier assigned by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Display name used when neither the document nor the session has one.
pub const FALLBACK_USER_NAME: &str = "User";

/// Application user document stored in the `users` collection.
///
/// Missing fields deserialize to their defaults so partially written documents
/// still load. `email` is written once at registration and carried over
/// unchanged by profile edits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    /// Auth provider user id; also the document key.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email captured at registration.
    pub email: String,
    /// Optional avatar URL.
    pub photo_url: Option<String>,
    /// Country picked at registration or in the profile editor.
    pub country: String,
}

impl User {
    /// Synthesize a user from session attributes when no document exists.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::{Session, User, UserId};
    ///
    /// let session = Session::new(UserId::new("u1").unwrap(), "a@x.com");
    /// let user = User::from_session(&session);
    /// assert_eq!(user.name, "User");
    /// assert_eq!(user.email, "a@x.com");
    /// assert!(user.country.is_empty());
    /// ```
    pub fn from_session(session: &Session) -> Self {
        Self {
            id: session.user_id.to_string(),
            name: session
                .display_name
                .clone()
                .filter(|name| !name.trim().is_empty())
                .unwrap_or_else(|| FALLBACK_USER_NAME.to_owned()),
            email: session.email.clone(),
            photo_url: session.photo_url.clone(),
            country: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" abc", UserValidationError::InvalidId)]
    #[case("abc\n", UserValidationError::InvalidId)]
    fn rejects_invalid_ids(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    fn user_document_uses_camel_case_keys() {
        let user = User {
            id: "u1".into(),
            name: "Amira".into(),
            email: "a@x.com".into(),
            photo_url: Some("https://img.example/a.png".into()),
            country: "Jordan".into(),
        };
        let value = serde_json::to_value(&user).expect("serialize");
        assert_eq!(
            value,
            json!({
                "id": "u1",
                "name": "Amira",
                "email": "a@x.com",
                "photoUrl": "https://img.example/a.png",
                "country": "Jordan",
            })
        );
    }

    #[rstest]
    fn missing_fields_fall_back_to_defaults() {
        let user: User = serde_json::from_value(json!({ "id": "u1" })).expect("deserialize");
        assert_eq!(user.id, "u1");
        assert!(user.name.is_empty());
        assert!(user.photo_url.is_none());
    }

    #[rstest]
    fn session_display_name_wins_over_fallback() {
        let mut session = Session::new(UserId::new("u1").expect("id"), "a@x.com");
        session.display_name = Some("Amira".into());
        assert_eq!(User::from_session(&session).name, "Amira");
    }
}
