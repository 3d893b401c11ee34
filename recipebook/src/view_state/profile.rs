//! Profile screen: the caller's user record and their recipes.
//!
//! Logging out wins over any workflow still in flight: each workflow
//! remembers the logout epoch it started in and drops its state updates once
//! a logout has bumped it.

use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info, warn};

use crate::domain::{
    AppResult, Error, ProfileChange, REMEMBER_ME_KEY, Recipe, Session, User,
};

use super::{AppContext, InFlight, Observable, auth_error, read_error, write_error};

/// Status of the profile screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileState {
    /// Fetching the user record and recipes.
    Loading,
    /// Profile loaded.
    Success {
        /// The caller's user record.
        user: User,
        /// Recipes the caller created.
        user_recipes: Vec<Recipe>,
    },
    /// Loading or a mutation failed.
    Error {
        /// Message shown in place of the profile.
        message: String,
    },
    /// No signed-in user.
    LoggedOut,
}

/// State holder behind the profile screen.
pub struct ProfileViewState {
    ctx: AppContext,
    state: Observable<ProfileState>,
    in_flight: InFlight,
    logouts: AtomicU64,
}

impl ProfileViewState {
    /// Holder in `Loading`; call [`Self::load`] to populate it.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Observable::new(ProfileState::Loading),
            in_flight: InFlight::default(),
            logouts: AtomicU64::new(0),
        }
    }

    /// Create the holder and run the initial load.
    ///
    /// A failed load is reflected in [`Self::state`].
    pub async fn open(ctx: AppContext) -> Self {
        let profile = Self::new(ctx);
        if let Err(err) = profile.load().await {
            debug!(error = %err, "initial profile load failed");
        }
        profile
    }

    /// Current status.
    pub fn state(&self) -> ProfileState {
        self.state.get()
    }

    /// Observable behind [`Self::state`].
    pub fn observe_state(&self) -> &Observable<ProfileState> {
        &self.state
    }

    /// Fetch the user record and the caller's recipes concurrently.
    pub async fn load(&self) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let epoch = self.epoch();
        let Some(session) = self.ctx.session() else {
            self.publish(epoch, ProfileState::LoggedOut);
            return Ok(());
        };
        self.reload(epoch, &session).await
    }

    /// Write a new name, country and photo, then reload.
    ///
    /// A blank photo URL removes the current photo.
    pub async fn update_profile(&self, name: &str, country: &str, photo_url: &str) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let epoch = self.epoch();
        let Some(session) = self.ctx.session() else {
            self.publish(epoch, ProfileState::LoggedOut);
            return Ok(());
        };
        self.publish(epoch, ProfileState::Loading);
        if let Err(err) = self.write_profile(&session, name, country, photo_url).await {
            return self.fail(epoch, err.context("Failed to update profile"));
        }
        info!(user_id = %session.user_id, "profile updated");
        self.reload(epoch, &session).await
    }

    async fn write_profile(
        &self,
        session: &Session,
        name: &str,
        country: &str,
        photo_url: &str,
    ) -> AppResult<()> {
        let photo_url = photo_url.trim();
        let change = ProfileChange {
            display_name: name.to_owned(),
            photo_url: (!photo_url.is_empty()).then(|| photo_url.to_owned()),
        };
        self.ctx
            .auth
            .update_profile(&change)
            .await
            .map_err(auth_error)?;
        let user = User {
            id: session.user_id.to_string(),
            name: change.display_name,
            email: session.email.clone(),
            photo_url: change.photo_url,
            country: country.to_owned(),
        };
        self.ctx.users.save(&user).await.map_err(write_error)
    }

    /// Delete one of the caller's recipes, then reload.
    pub async fn delete_recipe(&self, id: &str) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        let epoch = self.epoch();
        let Some(session) = self.ctx.session() else {
            self.publish(epoch, ProfileState::LoggedOut);
            return Ok(());
        };
        self.publish(epoch, ProfileState::Loading);
        if let Err(err) = self.ctx.recipes.delete(id).await {
            return self.fail(epoch, write_error(err).context("Failed to delete recipe"));
        }
        info!(recipe_id = %id, "recipe deleted");
        self.reload(epoch, &session).await
    }

    /// Sign out, forget the remember-me choice and show the logged-out
    /// state.
    ///
    /// Runs even while another workflow is in flight; that workflow's later
    /// updates are dropped.
    pub async fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::AcqRel);
        self.ctx.auth.sign_out().await;
        if let Err(err) = self.ctx.set_preference(REMEMBER_ME_KEY, false) {
            warn!(error = %err, "failed to clear remember-me");
        }
        self.state.set(ProfileState::LoggedOut);
    }

    fn epoch(&self) -> u64 {
        self.logouts.load(Ordering::Acquire)
    }

    /// Set `next` unless a logout happened after `epoch` was taken.
    ///
    /// The epoch is compared under the channel's write lock; `logout` bumps
    /// it before publishing `LoggedOut`.
    fn publish(&self, epoch: u64, next: ProfileState) {
        self.state.modify(|state| {
            if self.epoch() == epoch {
                *state = next;
            } else {
                debug!("dropping profile update after logout");
            }
        });
    }

    async fn reload(&self, epoch: u64, session: &Session) -> AppResult<()> {
        self.publish(epoch, ProfileState::Loading);
        let fetched = tokio::try_join!(
            async { self.ctx.users.find_by_id(&session.user_id).await.map_err(read_error) },
            async {
                self.ctx
                    .recipes
                    .list_by_creator(&session.user_id)
                    .await
                    .map_err(read_error)
            },
        );
        match fetched {
            Ok((user, user_recipes)) => {
                let user = user.unwrap_or_else(|| User::from_session(session));
                debug!(user_id = %session.user_id, recipes = user_recipes.len(), "profile loaded");
                self.publish(epoch, ProfileState::Success { user, user_recipes });
                Ok(())
            }
            Err(err) => self.fail(epoch, err.context("Failed to load profile")),
        }
    }

    fn fail(&self, epoch: u64, err: Error) -> AppResult<()> {
        warn!(code = ?err.code(), message = %err.message(), "profile workflow failed");
        self.publish(
            epoch,
            ProfileState::Error {
                message: err.message().to_owned(),
            },
        );
        Err(err)
    }
}
