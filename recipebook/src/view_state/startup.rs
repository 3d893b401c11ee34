//! Launch-time routing.

use tracing::debug;

use crate::domain::{REMEMBER_ME_DEFAULT, REMEMBER_ME_KEY, StartDestination};

use super::AppContext;

/// Pick the first screen. A session left over from a login that was not
/// remembered is signed out first.
pub async fn resolve_start_destination(ctx: &AppContext) -> StartDestination {
    let remember_me = ctx.preference(REMEMBER_ME_KEY, REMEMBER_ME_DEFAULT);
    let has_session = ctx.session().is_some();
    if has_session && !remember_me {
        debug!("discarding session that was not remembered");
        ctx.auth.sign_out().await;
    }
    StartDestination::resolve(remember_me, has_session)
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::view_state::test_support::Mocks;
    use rstest::rstest;

    #[rstest]
    #[case(Some(true), true, StartDestination::Home, 0)]
    #[case(None, true, StartDestination::Home, 0)]
    #[case(Some(false), true, StartDestination::Login, 1)]
    #[case(Some(true), false, StartDestination::Login, 0)]
    #[tokio::test]
    async fn routes_from_flag_and_session(
        #[case] stored: Option<bool>,
        #[case] signed_in: bool,
        #[case] expected: StartDestination,
        #[case] sign_outs: usize,
    ) {
        let mut mocks = if signed_in {
            Mocks::default().with_session("u1")
        } else {
            Mocks::default().without_session()
        };
        mocks
            .preferences
            .expect_get_bool()
            .returning(move |_| Ok(stored));
        mocks.auth.expect_sign_out().times(sign_outs).returning(|| ());

        let destination = resolve_start_destination(&mocks.into_context()).await;
        assert_eq!(destination, expected);
    }
}
