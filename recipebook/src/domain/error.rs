//! Domain-level error types.
//!
//! Errors are caught at the workflow boundary of each state holder and turned
//! into the holder's error state. The same value is returned to the caller so
//! front ends can decide how to surface it (inline message, toast, exit code).

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Local pre-flight validation failed; nothing reached the backend.
    InvalidRequest,
    /// Credentials or provider configuration were rejected, or no session.
    Unauthorized,
    /// The requested document does not exist.
    NotFound,
    /// The workflow is already running and rejected a second invocation.
    Busy,
    /// A backend read failed.
    ReadFailed,
    /// A backend write failed.
    WriteFailed,
    /// An unexpected error occurred inside the core.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use recipebook::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Recipe not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "Recipe not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ErrorValidationError {
    /// The supplied message was blank.
    #[error("error message must not be empty")]
    EmptyMessage,
}

impl Error {
    /// Create a new error, panicking if validation fails.
    ///
    /// Only call this with literal or already-checked messages; use
    /// [`Error::try_new`] for text coming from collaborators.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self { code, message })
    }

    /// Build an error from collaborator text, substituting `fallback` when the
    /// text is blank.
    ///
    /// # Examples
    /// ```
    /// use recipebook::domain::{Error, ErrorCode};
    ///
    /// let err = Error::with_fallback(ErrorCode::WriteFailed, "  ", "Failed to save recipe");
    /// assert_eq!(err.message(), "Failed to save recipe");
    /// ```
    pub fn with_fallback(code: ErrorCode, message: impl Into<String>, fallback: &str) -> Self {
        Self::try_new(code, message).unwrap_or_else(|_| Self::new(code, fallback))
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message shown by the screen.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether the error is the re-entrancy rejection.
    pub fn is_busy(&self) -> bool {
        self.code == ErrorCode::Busy
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::Busy`].
    pub fn busy() -> Self {
        Self::new(ErrorCode::Busy, "Another request is already in progress")
    }

    /// Convenience constructor for [`ErrorCode::ReadFailed`].
    pub fn read_failed(message: impl Into<String>) -> Self {
        Self::with_fallback(ErrorCode::ReadFailed, message, "Failed to read data")
    }

    /// Convenience constructor for [`ErrorCode::WriteFailed`].
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::with_fallback(ErrorCode::WriteFailed, message, "Failed to write data")
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_fallback(ErrorCode::InternalError, message, "Unexpected error")
    }

    /// Prefix the message while keeping the code, e.g. `Failed to load profile: …`.
    pub fn context(self, prefix: &str) -> Self {
        Self {
            code: self.code,
            message: format!("{prefix}: {}", self.message),
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        Error::try_new(value.code, value.message)
    }
}
