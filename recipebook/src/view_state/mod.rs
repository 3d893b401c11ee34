//! Screen state holders.
//!
//! Each holder owns a set of [`Observable`] fields and the workflows that
//! mutate them. Workflows share one shape: reject re-entry with
//! [`Error::busy`], validate locally, flip to `Loading`, call a port, then
//! settle on a terminal status. Every failure is stored in the holder's
//! error state and also returned to the caller.
//!
//! Holders receive their collaborators through [`AppContext`]; nothing reads
//! session or preference state ambiently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::warn;

use crate::domain::ports::{
    AuthService, AuthServiceError, PreferenceStore, RecipeRepository, RepositoryError,
    UserRepository,
};
use crate::domain::{
    AppResult, AuthFailure, Error, ImageUrlTemplate, LocalPreferences, DARK_THEME_DEFAULT,
    DARK_THEME_KEY, REMEMBER_ME_DEFAULT, REMEMBER_ME_KEY, Session,
};

pub mod auth;
pub mod profile;
pub mod recipe_detail;
pub mod recipe_form;
pub mod recipe_list;
pub mod startup;
pub mod theme;

pub use auth::{AuthState, AuthViewState};
pub use profile::{ProfileState, ProfileViewState};
pub use recipe_detail::{DetailState, RecipeDetailState};
pub use recipe_form::{FormStatus, RecipeFormState};
pub use recipe_list::{FeedStatus, RecipeListState};
pub use startup::resolve_start_destination;
pub use theme::ThemeState;

/// Collaborators shared by every state holder.
#[derive(Clone)]
pub struct AppContext {
    /// Email/password identity provider.
    pub auth: Arc<dyn AuthService>,
    /// Recipe documents.
    pub recipes: Arc<dyn RecipeRepository>,
    /// User profile documents.
    pub users: Arc<dyn UserRepository>,
    /// Device-local flags.
    pub preferences: Arc<dyn PreferenceStore>,
    /// Derives placeholder images from recipe titles.
    pub images: ImageUrlTemplate,
}

impl AppContext {
    /// The signed-in caller, if any.
    pub fn session(&self) -> Option<Session> {
        self.auth.current_session()
    }

    /// Read a flag, falling back to `default` when unset or unreadable.
    pub fn preference(&self, key: &str, default: bool) -> bool {
        match self.preferences.get_bool(key) {
            Ok(value) => value.unwrap_or(default),
            Err(err) => {
                warn!(key, error = %err, "preference unreadable; using default");
                default
            }
        }
    }

    /// Persist a flag.
    pub fn set_preference(&self, key: &str, value: bool) -> AppResult<()> {
        self.preferences
            .set_bool(key, value)
            .map_err(|err| Error::write_failed(err.to_string()))
    }

    /// Both local flags with their defaults applied.
    pub fn local_preferences(&self) -> LocalPreferences {
        LocalPreferences {
            remember_me: self.preference(REMEMBER_ME_KEY, REMEMBER_ME_DEFAULT),
            dark_theme: self.preference(DARK_THEME_KEY, DARK_THEME_DEFAULT),
        }
    }
}

/// A value screens can read now or watch for changes.
///
/// Writes never fail, even with no subscribers, and late subscribers start
/// from the current value.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T> Observable<T> {
    /// Start with `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            sender: watch::Sender::new(initial),
        }
    }

    /// Replace the value and notify subscribers.
    pub fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    /// Edit the value in place and notify subscribers.
    pub fn modify(&self, edit: impl FnOnce(&mut T)) {
        self.sender.send_modify(edit);
    }

    /// Receiver that observes every subsequent change.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.sender.subscribe()
    }
}

impl<T: Clone> Observable<T> {
    /// Current value.
    pub fn get(&self) -> T {
        self.sender.borrow().clone()
    }

    /// Wait until the value satisfies `ready` and return it.
    pub async fn wait_for(&self, mut ready: impl FnMut(&T) -> bool) -> T {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|value| ready(value)).await {
            Ok(value) => value.clone(),
            // The sender lives in `self`, so the channel cannot close here.
            Err(_) => self.get(),
        }
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

/// Re-entrancy guard for one workflow family.
#[derive(Debug, Default)]
pub(crate) struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    /// Claim the workflow, or fail with [`Error::busy`] if it is running.
    pub(crate) fn begin(&self) -> AppResult<InFlightGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlightGuard { busy: &self.busy })
            .map_err(|_| Error::busy())
    }
}

/// Releases the workflow when dropped, including on early return.
#[derive(Debug)]
pub(crate) struct InFlightGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Map an auth provider failure to the message shown on screen.
pub(crate) fn auth_error(err: AuthServiceError) -> Error {
    let failure = AuthFailure::classify(&err.to_string());
    match err {
        AuthServiceError::Unavailable { .. } => Error::internal(failure.message()),
        AuthServiceError::Rejected { .. } | AuthServiceError::NoSession => {
            Error::unauthorized(failure.message())
        }
    }
}

pub(crate) fn read_error(err: RepositoryError) -> Error {
    Error::read_failed(err.to_string())
}

pub(crate) fn write_error(err: RepositoryError) -> Error {
    Error::write_failed(err.to_string())
}


#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::test_support::Mocks;
    use super::*;
    use crate::domain::ports::PreferenceStoreError;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn in_flight_rejects_second_claim_until_released() {
        let guard = InFlight::default();
        let first = guard.begin().expect("first claim");
        let second = guard.begin().expect_err("busy");
        assert!(second.is_busy());
        drop(first);
        assert!(guard.begin().is_ok());
    }

    #[rstest]
    #[tokio::test]
    async fn observable_wait_for_sees_later_writes() {
        let value = Arc::new(Observable::new(0_u32));
        let writer = Arc::clone(&value);
        tokio::spawn(async move {
            for n in 1..=3 {
                writer.set(n);
                tokio::task::yield_now().await;
            }
        });
        let seen = value.wait_for(|n| *n >= 3).await;
        assert_eq!(seen, 3);
    }

    #[rstest]
    fn unreadable_preferences_fall_back_to_defaults() {
        let mut mocks = Mocks::default();
        mocks
            .preferences
            .expect_get_bool()
            .returning(|_| Err(PreferenceStoreError::corrupt("bad json")));
        let ctx = mocks.into_context();
        assert_eq!(ctx.local_preferences(), LocalPreferences::default());
    }

    #[rstest]
    #[case(AuthServiceError::rejected("The email address is badly formatted."), ErrorCode::Unauthorized, "Invalid email address")]
    #[case(AuthServiceError::rejected(""), ErrorCode::Unauthorized, "Authentication failed")]
    #[case(AuthServiceError::unavailable("disk full"), ErrorCode::InternalError, "auth provider unavailable: disk full")]
    fn auth_errors_map_to_screen_messages(
        #[case] err: AuthServiceError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        let mapped = auth_error(err);
        assert_eq!(mapped.code(), code);
        assert_eq!(mapped.message(), message);
    }
}
