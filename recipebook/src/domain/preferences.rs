//! Device-local preference flags.
//!
//! Two booleans survive restarts: whether the login should be remembered and
//! whether the dark theme is active. They live in a key-value
//! [`crate::domain::ports::PreferenceStore`] and are injected into the state
//! holders through [`crate::view_state::AppContext`] rather than read
//! ambiently.

/// Preference key for the remember-me checkbox.
pub const REMEMBER_ME_KEY: &str = "remember_me";
/// Preference key for the theme switch.
pub const DARK_THEME_KEY: &str = "is_dark_theme";

/// Remember-me is on until the user unticks it or logs out.
pub const REMEMBER_ME_DEFAULT: bool = true;
/// Light theme unless the user switched.
pub const DARK_THEME_DEFAULT: bool = false;

/// Snapshot of both flags.
///
/// # Examples
/// ```
/// use recipebook::domain::LocalPreferences;
///
/// let prefs = LocalPreferences::default();
/// assert!(prefs.remember_me);
/// assert!(!prefs.dark_theme);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalPreferences {
    /// Keep the session across app restarts.
    pub remember_me: bool,
    /// Render with the dark palette.
    pub dark_theme: bool,
}

impl Default for LocalPreferences {
    fn default() -> Self {
        Self {
            remember_me: REMEMBER_ME_DEFAULT,
            dark_theme: DARK_THEME_DEFAULT,
        }
    }
}

/// First screen shown after launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDestination {
    /// Credentials screen.
    Login,
    /// Recipe feed.
    Home,
}

impl StartDestination {
    /// Pick the destination from the remember-me flag and session presence.
    ///
    /// A live session is only honoured when remember-me is on.
    pub fn resolve(remember_me: bool, has_session: bool) -> Self {
        if remember_me && has_session {
            Self::Home
        } else {
            Self::Login
        }
    }

    /// Route name used by the navigation layer.
    pub fn route(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Home => "home",
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(true, true, StartDestination::Home)]
    #[case(true, false, StartDestination::Login)]
    #[case(false, true, StartDestination::Login)]
    #[case(false, false, StartDestination::Login)]
    fn resolves_destination(
        #[case] remember_me: bool,
        #[case] has_session: bool,
        #[case] expected: StartDestination,
    ) {
        assert_eq!(StartDestination::resolve(remember_me, has_session), expected);
    }
}
