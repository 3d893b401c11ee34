//! Light/dark theme switch persisted in local preferences.

use tracing::debug;

use crate::domain::{AppResult, DARK_THEME_DEFAULT, DARK_THEME_KEY};

use super::{AppContext, Observable};

/// Theme flag shared by every screen.
pub struct ThemeState {
    ctx: AppContext,
    is_dark: Observable<bool>,
}

impl ThemeState {
    /// Start from the stored flag.
    pub fn new(ctx: AppContext) -> Self {
        let is_dark = ctx.preference(DARK_THEME_KEY, DARK_THEME_DEFAULT);
        Self {
            ctx,
            is_dark: Observable::new(is_dark),
        }
    }

    /// Whether the dark palette is active.
    pub fn is_dark(&self) -> bool {
        self.is_dark.get()
    }

    /// Observable behind [`Self::is_dark`].
    pub fn observe(&self) -> &Observable<bool> {
        &self.is_dark
    }

    /// Flip the theme and persist the new value.
    pub fn toggle_theme(&self) -> AppResult<()> {
        self.set_dark_theme(!self.is_dark())
    }

    /// Set the theme explicitly and persist it. The in-memory flag only
    /// changes once the write succeeds.
    pub fn set_dark_theme(&self, dark: bool) -> AppResult<()> {
        self.ctx.set_preference(DARK_THEME_KEY, dark)?;
        self.is_dark.set(dark);
        debug!(dark, "theme changed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::PreferenceStoreError;
    use crate::view_state::test_support::Mocks;
    use rstest::rstest;

    #[rstest]
    fn toggle_persists_and_flips() {
        let mut mocks = Mocks::default();
        mocks
            .preferences
            .expect_get_bool()
            .returning(|_| Ok(Some(false)));
        mocks
            .preferences
            .expect_set_bool()
            .withf(|key, value| key == DARK_THEME_KEY && *value)
            .times(1)
            .returning(|_, _| Ok(()));
        let theme = ThemeState::new(mocks.into_context());
        assert!(!theme.is_dark());

        theme.toggle_theme().expect("toggle");
        assert!(theme.is_dark());
    }

    #[rstest]
    fn failed_write_keeps_current_theme() {
        let mut mocks = Mocks::default();
        mocks.preferences.expect_get_bool().returning(|_| Ok(None));
        mocks
            .preferences
            .expect_set_bool()
            .returning(|_, _| Err(PreferenceStoreError::io("read-only")));
        let theme = ThemeState::new(mocks.into_context());

        let err = theme.set_dark_theme(true).expect_err("read-only");
        assert_eq!(err.code(), ErrorCode::WriteFailed);
        assert!(!theme.is_dark());
    }
}
