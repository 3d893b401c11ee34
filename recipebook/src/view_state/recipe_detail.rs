//! Recipe detail screen.

use tracing::{debug, info, warn};

use crate::domain::{AppResult, Error, Recipe};

use super::{AppContext, InFlight, Observable, read_error, write_error};

/// Status of the detail screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailState {
    /// Fetching the recipe.
    Loading,
    /// Recipe loaded.
    Success {
        /// The recipe.
        recipe: Recipe,
        /// Whether the caller created it and may edit or delete it.
        is_creator: bool,
    },
    /// Loading or deleting failed.
    Error {
        /// Message shown in place of the recipe.
        message: String,
    },
    /// The recipe was deleted from this screen.
    Deleted,
}

/// State holder behind the detail screen.
pub struct RecipeDetailState {
    ctx: AppContext,
    state: Observable<DetailState>,
    in_flight: InFlight,
}

impl RecipeDetailState {
    /// Holder in `Loading`.
    pub fn new(ctx: AppContext) -> Self {
        Self {
            ctx,
            state: Observable::new(DetailState::Loading),
            in_flight: InFlight::default(),
        }
    }

    /// Current status.
    pub fn state(&self) -> DetailState {
        self.state.get()
    }

    /// Observable behind [`Self::state`].
    pub fn observe_state(&self) -> &Observable<DetailState> {
        &self.state
    }

    /// Fetch the recipe and work out whether the caller owns it.
    pub async fn load_recipe(&self, id: &str) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        self.fetch(id, false).await
    }

    /// Delete the recipe, then reload it to confirm it is gone.
    pub async fn delete_recipe(&self, id: &str) -> AppResult<()> {
        let _guard = self.in_flight.begin()?;
        self.state.set(DetailState::Loading);
        if let Err(err) = self.ctx.recipes.delete(id).await {
            return self.fail(write_error(err).context("Failed to delete recipe"));
        }
        info!(recipe_id = %id, "recipe deleted");
        self.fetch(id, true).await
    }

    async fn fetch(&self, id: &str, after_delete: bool) -> AppResult<()> {
        self.state.set(DetailState::Loading);
        debug!(recipe_id = %id, "loading recipe");
        match self.ctx.recipes.find_by_id(id).await {
            Ok(Some(recipe)) => {
                let caller = self.ctx.session().map(|session| session.user_id);
                let is_creator = recipe.is_owned_by(caller.as_ref());
                self.state.set(DetailState::Success { recipe, is_creator });
                Ok(())
            }
            Ok(None) if after_delete => {
                self.state.set(DetailState::Deleted);
                Ok(())
            }
            Ok(None) => self.fail(Error::not_found("Recipe not found")),
            Err(err) => self.fail(read_error(err).context("Error loading recipe")),
        }
    }

    fn fail(&self, err: Error) -> AppResult<()> {
        warn!(code = ?err.code(), message = %err.message(), "recipe detail failed");
        self.state.set(DetailState::Error {
            message: err.message().to_owned(),
        });
        Err(err)
    }
}
