//! Route gating: pure decisions over the shared [`AuthState`].

use crate::profile::ProfileStatus;
use crate::session::AuthState;

pub const LOGIN_PATH: &str = "/login";
pub const PROFILE_PATH: &str = "/profile";
pub const HOME_PATH: &str = "/";

/// Outcome of gating a navigation to a protected path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    /// A probe is in flight; render a neutral spinner, never the target.
    Loading,
    /// Nobody is signed in; redirect to login and come back afterwards.
    RequireLogin { return_to: String },
    /// Signed in but no profile; redirect to the completion form.
    RequireProfile,
    /// Render the target.
    Allowed,
}

/// Gate for fully protected views: requires both an identity and a profile.
///
/// `Unknown` after a failed probe resolves to `Allowed` rather than blocking,
/// since the probe itself may be the broken piece. A signed-in user on the
/// profile-completion path is always allowed to stay, whatever their profile
/// status and even mid-probe, so the RequireProfile redirect can never loop
/// and the completion form never flickers behind a spinner.
pub fn protected(state: &mut AuthState, path: &str) -> GateDecision {
    if state.identity().is_none() {
        state.remember_path(path);
        return GateDecision::RequireLogin {
            return_to: path.to_string(),
        };
    }

    if path == PROFILE_PATH {
        return GateDecision::Allowed;
    }

    if state.is_probing() {
        return GateDecision::Loading;
    }

    if state.profile_status() == ProfileStatus::Missing {
        return GateDecision::RequireProfile;
    }

    GateDecision::Allowed
}

/// Gate for views that only need a signed-in user, independent of profile
/// status. The profile-completion view itself sits behind this one.
pub fn require_login_only(state: &mut AuthState, path: &str) -> GateDecision {
    if state.identity().is_none() {
        state.remember_path(path);
        return GateDecision::RequireLogin {
            return_to: path.to_string(),
        };
    }
    GateDecision::Allowed
}

/// Outcome of gating an auth view (login/registration).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthRedirect {
    /// Not signed in: show the auth view.
    Render,
    /// Already signed in: go to the remembered pre-login target, or home.
    Redirect(String),
}

/// Keeps authenticated users off the login and registration views.
pub fn redirect_if_authenticated(state: &mut AuthState) -> AuthRedirect {
    if state.identity().is_none() {
        return AuthRedirect::Render;
    }
    let target = state
        .take_return_path()
        .unwrap_or_else(|| HOME_PATH.to_string());
    AuthRedirect::Redirect(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::{Identity, Role};
    use crate::profile;
    use crate::FetchError;

    fn identity() -> Identity {
        Identity {
            subject_id: "u-1".to_string(),
            role: Role::User,
            token: "h.p.s".to_string(),
        }
    }

    fn state_with(status: ProfileStatus) -> AuthState {
        let mut state = AuthState::new();
        state.sign_in(identity());
        if status != ProfileStatus::Unknown {
            let ticket = profile::begin(&mut state).unwrap();
            let outcome = match status {
                ProfileStatus::Exists => Ok(Some(serde_json::json!({}))),
                ProfileStatus::Missing => Ok(None),
                ProfileStatus::Unknown => unreachable!(),
            };
            profile::apply(&mut state, ticket, outcome);
        }
        state
    }

    #[test]
    fn test_no_identity_always_requires_login() {
        let mut state = AuthState::new();
        for path in ["/", "/profile", "/job/123"] {
            assert_eq!(
                protected(&mut state, path),
                GateDecision::RequireLogin {
                    return_to: path.to_string()
                }
            );
        }
    }

    #[test]
    fn test_require_login_remembers_attempted_path() {
        let mut state = AuthState::new();
        protected(&mut state, "/job/42");
        state.sign_in(identity());
        assert_eq!(
            redirect_if_authenticated(&mut state),
            AuthRedirect::Redirect("/job/42".to_string())
        );
    }

    #[test]
    fn test_probe_in_flight_is_loading() {
        let mut state = AuthState::new();
        state.sign_in(identity());
        let _ticket = profile::begin(&mut state).unwrap();
        assert_eq!(protected(&mut state, "/"), GateDecision::Loading);
    }

    #[test]
    fn test_profile_path_allowed_even_mid_probe() {
        let mut state = AuthState::new();
        state.sign_in(identity());
        let _ticket = profile::begin(&mut state).unwrap();
        assert!(state.is_probing());
        assert_eq!(protected(&mut state, PROFILE_PATH), GateDecision::Allowed);
        // Other paths still wait for the probe.
        assert_eq!(protected(&mut state, "/"), GateDecision::Loading);
    }

    #[test]
    fn test_missing_profile_redirects_except_on_profile_path() {
        let mut state = state_with(ProfileStatus::Missing);
        assert_eq!(protected(&mut state, "/"), GateDecision::RequireProfile);
        assert_eq!(protected(&mut state, "/job/1"), GateDecision::RequireProfile);
        // No redirect loop.
        assert_eq!(protected(&mut state, PROFILE_PATH), GateDecision::Allowed);
    }

    #[test]
    fn test_existing_profile_is_allowed() {
        let mut state = state_with(ProfileStatus::Exists);
        assert_eq!(protected(&mut state, "/"), GateDecision::Allowed);
    }

    #[test]
    fn test_failed_probe_is_permissive() {
        let mut state = AuthState::new();
        state.sign_in(identity());
        let ticket = profile::begin(&mut state).unwrap();
        profile::apply(&mut state, ticket, Err(FetchError::Failed("down".to_string())));
        assert_eq!(state.profile_status(), ProfileStatus::Unknown);
        assert_eq!(protected(&mut state, "/"), GateDecision::Allowed);
    }

    #[test]
    fn test_require_login_only_ignores_profile_status() {
        let mut state = state_with(ProfileStatus::Missing);
        assert_eq!(
            require_login_only(&mut state, PROFILE_PATH),
            GateDecision::Allowed
        );

        let mut anon = AuthState::new();
        assert_eq!(
            require_login_only(&mut anon, PROFILE_PATH),
            GateDecision::RequireLogin {
                return_to: PROFILE_PATH.to_string()
            }
        );
    }

    #[test]
    fn test_redirect_if_authenticated_defaults_home() {
        let mut state = AuthState::new();
        assert_eq!(redirect_if_authenticated(&mut state), AuthRedirect::Render);

        state.sign_in(identity());
        assert_eq!(
            redirect_if_authenticated(&mut state),
            AuthRedirect::Redirect(HOME_PATH.to_string())
        );
    }
}
