//! Authentication primitives: credentials, registration input, sessions and
//! the mapping from raw provider errors to user-facing messages.
//!
//! Keep form parsing outside the workflows by exposing constructors that
//! validate string inputs before a holder talks to a port.

use std::fmt;

use zeroize::Zeroizing;

use super::UserId;

/// Message shown when login input is incomplete.
pub const LOGIN_FIELDS_REQUIRED: &str = "Email and password cannot be empty";
/// Message shown when registration input is incomplete.
pub const REGISTRATION_FIELDS_REQUIRED: &str = "All fields are required";

/// Domain error returned when login or registration input is blank.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialsValidationError {
    /// Email or password was blank.
    #[error("Email and password cannot be empty")]
    IncompleteLogin,
    /// At least one registration field was blank.
    #[error("All fields are required")]
    IncompleteRegistration,
}

/// Validated login credentials used by the auth capability.
///
/// ## Invariants
/// - neither `email` nor `password` is blank once trimmed.
/// - values are passed through verbatim; the provider owns normalization.
///
/// # Examples
/// ```
/// use recipebook::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("a@x.com", "secret1").unwrap();
/// assert_eq!(creds.email(), "a@x.com");
/// assert!(LoginCredentials::try_from_parts("a@x.com", "   ").is_err());
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        if email.trim().is_empty() || password.trim().is_empty() {
            return Err(CredentialsValidationError::IncompleteLogin);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email as typed by the user.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password as typed by the user.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    /// Display name for the new account.
    pub name: String,
    /// Email and password for the new account.
    pub credentials: LoginCredentials,
    /// Country picked from the registration dropdown.
    pub country: String,
}

impl Registration {
    /// Validate that every field is present.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        country: &str,
    ) -> Result<Self, CredentialsValidationError> {
        if [name, email, password, country]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(CredentialsValidationError::IncompleteRegistration);
        }
        let credentials = LoginCredentials::try_from_parts(email, password)
            .map_err(|_| CredentialsValidationError::IncompleteRegistration)?;
        Ok(Self {
            name: name.to_owned(),
            credentials,
            country: country.to_owned(),
        })
    }
}

/// Caller identity established by the auth capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Provider-issued user id.
    pub user_id: UserId,
    /// Email the account was created with.
    pub email: String,
    /// Display name on the auth profile, if set.
    pub display_name: Option<String>,
    /// Photo URL on the auth profile, if set.
    pub photo_url: Option<String>,
}

impl Session {
    /// Session with no profile attributes yet.
    pub fn new(user_id: UserId, email: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: None,
            photo_url: None,
        }
    }
}

/// Profile attributes written to the auth capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileChange {
    /// New display name.
    pub display_name: String,
    /// New photo URL; `None` removes the current one.
    pub photo_url: Option<String>,
}

/// Categories of auth failure surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthFailure {
    /// The provider has no configuration registered for this app.
    MissingConfiguration,
    /// The email address was rejected as malformed.
    MalformedEmail,
    /// Unknown account or wrong password.
    BadCredentials,
    /// The email address already has an account.
    DuplicateEmail,
    /// Anything else; carries the raw provider text.
    Unknown(String),
}

impl AuthFailure {
    /// Classify raw provider error text.
    ///
    /// Checks are case-insensitive substring matches, evaluated in a fixed
    /// order.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::AuthFailure;
    ///
    /// let failure = AuthFailure::classify("The email address is already in use by another account.");
    /// assert_eq!(failure, AuthFailure::DuplicateEmail);
    /// assert_eq!(failure.message(), "Email is already registered");
    /// ```
    pub fn classify(raw: &str) -> Self {
        let lowered = raw.to_lowercase();
        let contains = |needle: &str| lowered.contains(&needle.to_lowercase());
        if contains("CONFIGURATION_NOT_FOUND") {
            Self::MissingConfiguration
        } else if contains("The email address is badly formatted") {
            Self::MalformedEmail
        } else if contains("password is invalid") || contains("no user record") {
            Self::BadCredentials
        } else if contains("already in use") {
            Self::DuplicateEmail
        } else {
            Self::Unknown(raw.to_owned())
        }
    }

    /// User-facing message for the category.
    pub fn message(&self) -> &str {
        match self {
            Self::MissingConfiguration => {
                "Authentication is not configured for this app. Register the app with the auth provider and refresh its configuration."
            }
            Self::MalformedEmail => "Invalid email address",
            Self::BadCredentials => "Incorrect email or password",
            Self::DuplicateEmail => "Email is already registered",
            Self::Unknown(raw) if !raw.trim().is_empty() => raw.as_str(),
            Self::Unknown(_) => "Authentication failed",
        }
    }
}

impl fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}
