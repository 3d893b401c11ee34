//! Login and registration workflow.

use tracing::{debug, info, warn};

use crate::domain::{
    AppResult, Error, LoginCredentials, ProfileChange, REMEMBER_ME_DEFAULT, REMEMBER_ME_KEY,
    Registration, User,
};

use super::{AppContext, InFlight, Observable, auth_error, write_error};

/// Status of the auth screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Waiting for input.
    Idle,
    /// A sign-in or registration call is running.
    Loading,
    /// The last workflow completed.
    Success,
    /// The last workflow failed.
    Error {
        /// Message shown under the form.
        message: String,
    },
}

/// State holder behind the login and registration screens.
pub struct AuthViewState {
    ctx: AppContext,
    state: Observable<AuthState>,
    remember_me: Observable<bool>,
    in_flight: InFlight,
}

impl AuthViewState {
    /// Idle holder; the remember-me checkbox starts from the stored flag.
    pub fn new(ctx: AppContext) -> Self {
        let remember_me = ctx.preference(REMEMBER_ME_KEY, REMEMBER_ME_DEFAULT);
        Self {
            ctx,
            state: Observable::new(AuthState::Idle),
            remember_me: Observable::new(remember_me),
            in_flight: InFlight::default(),
        }
    }

    /// Current status.
    pub fn state(&self) -> AuthState {
        self.state.get()
    }

    /// Status observable.
    pub fn observe_state(&self) -> &Observable<AuthState> {
        &self.state
    }

    /// Whether a successful login will be remembered.
    pub fn remember_me(&self) -> bool {
        self.remember_me.get()
    }

    /// Tick or untick the remember-me checkbox. Stored on the next
    /// successful login.
    pub fn remember_login(&self, remember: bool) {
        self.remember_me.set(remember);
    }

    /// Sign in with email and password.
    ///
    /// Blank fields fail without contacting the provider.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let credentials = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => return self.fail(Error::invalid_request(err.to_string())),
        };
        self.state.set(AuthState::Loading);
        debug!("signing in");
        let session = match self.ctx.auth.sign_in(&credentials).await {
            Ok(session) => session,
            Err(err) => return self.fail(auth_error(err)),
        };
        if let Err(err) = self.ctx.set_preference(REMEMBER_ME_KEY, self.remember_me.get()) {
            warn!(error = %err, "failed to store remember-me choice");
        }
        info!(user_id = %session.user_id, "signed in");
        self.state.set(AuthState::Success);
        Ok(())
    }

    /// Create an account, record its profile document and leave the caller
    /// signed out so they log in explicitly.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        country: &str,
    ) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let registration = match Registration::try_from_parts(name, email, password, country) {
            Ok(registration) => registration,
            Err(err) => return self.fail(Error::invalid_request(err.to_string())),
        };
        self.state.set(AuthState::Loading);
        match self.create_profile(&registration).await {
            Ok(user) => {
                info!(user_id = %user.id, "account registered");
                self.state.set(AuthState::Success);
                Ok(())
            }
            Err(err) => self.fail(err),
        }
    }

    async fn create_profile(&self, registration: &Registration) -> AppResult<User> {
        let created = self
            .ctx
            .auth
            .create_account(&registration.credentials)
            .await
            .map_err(auth_error)?;
        let session = self
            .ctx
            .auth
            .update_profile(&ProfileChange {
                display_name: registration.name.clone(),
                photo_url: None,
            })
            .await
            .map_err(auth_error)?;
        let user = User {
            id: created.user_id.to_string(),
            name: registration.name.clone(),
            email: created.email.clone(),
            photo_url: session.photo_url,
            country: registration.country.clone(),
        };
        self.ctx.users.save(&user).await.map_err(write_error)?;
        self.ctx.auth.sign_out().await;
        Ok(user)
    }

    /// Clear any terminal status.
    pub fn reset_state(&self) {
        self.state.set(AuthState::Idle);
    }

    fn fail(&self, err: Error) -> AppResult<()> {
        warn!(code = ?err.code(), message = %err.message(), "auth workflow failed");
        self.state.set(AuthState::Error {
            message: err.message().to_owned(),
        });
        Err(err)
    }
}
