//! Driven port for the external authentication capability.
//!
//! Workflows call this port to sign in, create accounts and edit the auth
//! profile without knowing which provider backs it. Provider failures carry
//! the provider's raw message text; the auth workflow classifies that text
//! into user-facing categories with [`crate::domain::AuthFailure`].

use async_trait::async_trait;

use crate::domain::{LoginCredentials, ProfileChange, Session};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth capability adapters.
    pub enum AuthServiceError {
        /// The provider refused the request; `message` is its raw text.
        Rejected { message: String } => "{message}",
        /// The provider could not be reached.
        Unavailable { message: String } => "auth provider unavailable: {message}",
        /// The operation needs a signed-in user and there is none.
        NoSession => "no signed-in user",
    }
}

/// Capability interface for the auth provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Sign in with email and password, establishing the current session.
    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Session, AuthServiceError>;

    /// Create an account. The new account becomes the current session.
    async fn create_account(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Session, AuthServiceError>;

    /// Overwrite the display name and photo of the current session's profile.
    async fn update_profile(&self, change: &ProfileChange) -> Result<Session, AuthServiceError>;

    /// End the current session. Signing out without a session is a no-op.
    async fn sign_out(&self);

    /// The current session, if any.
    fn current_session(&self) -> Option<Session>;
}
