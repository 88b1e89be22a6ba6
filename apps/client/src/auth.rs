//! Credential exchange and the login/logout flows.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::JobBoardApi;
use crate::error::AuthError;
use crate::identity::Identity;
use crate::profile::{self, ProfileStatus};
use crate::session::{AuthState, SessionStore, TokenDisk};

/// Minimum password length, checked before any network call is made.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Exchanges credentials for an [`Identity`]. Persisting the result and
/// probing the profile are the caller's responsibility; [`sign_in`] wires the
/// whole sequence together.
pub struct AuthGateway {
    api: Arc<dyn JobBoardApi>,
}

impl AuthGateway {
    pub fn new(api: Arc<dyn JobBoardApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &dyn JobBoardApi {
        self.api.as_ref()
    }

    /// Logs in and derives the identity from the returned token's payload.
    /// A token missing its required claims is a service fault, not a
    /// credentials problem.
    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let response = self.api.login(email, password).await?;
        Identity::from_token(&response.token)
            .map_err(|e| AuthError::ServiceUnavailable(format!("malformed token: {e}")))
    }

    /// Registers a new account. The password policy is enforced here, before
    /// any network call.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AuthError> {
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::WeakPassword);
        }
        self.api.register(username, email, password).await
    }
}

/// Full login flow: exchange credentials, persist the session, probe the
/// profile. Returns the profile status so the caller can route immediately
/// (Missing → completion form, otherwise → home).
pub async fn sign_in<D: TokenDisk>(
    gateway: &AuthGateway,
    store: &SessionStore<D>,
    state: &mut AuthState,
    email: &str,
    password: &str,
) -> Result<ProfileStatus, AuthError> {
    let identity = gateway.login(email, password).await?;
    if let Err(e) = store.save(&identity) {
        // A failed write only costs the user a re-login after restart.
        warn!("Failed to persist session: {e}");
    }
    info!("Signed in as {}", identity.subject_id);
    state.sign_in(identity);
    Ok(profile::probe(gateway.api(), state).await)
}

/// Logout: drop the persisted session and reset the shared state.
pub fn sign_out<D: TokenDisk>(store: &SessionStore<D>, state: &mut AuthState) {
    store.clear();
    state.sign_out();
    info!("Signed out");
}
