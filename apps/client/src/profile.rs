//! Profile-existence probing.
//!
//! The backend answers `GET /profile/` with 200 when a profile row exists and
//! 404 when it does not; anything else is indeterminate. The prober never
//! fails: every outcome maps onto [`ProfileStatus`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::api::JobBoardApi;
use crate::error::FetchError;
use crate::session::AuthState;

/// Whether a completed profile exists for the current identity.
///
/// `Unknown` is both the initial value and the result of an indeterminate
/// probe (network fault, 5xx). It is deliberately not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileStatus {
    #[default]
    Unknown,
    Exists,
    Missing,
}

/// A dispatched probe: the sequence number that makes the latest probe
/// authoritative, plus the token it was dispatched with.
#[derive(Debug)]
pub struct ProbeTicket {
    seq: u64,
    pub token: String,
}

/// Dispatches a probe for the current identity. Returns `None` when nobody
/// is signed in (in which case the status is already `Unknown`).
pub fn begin(state: &mut AuthState) -> Option<ProbeTicket> {
    let token = state.identity()?.token.clone();
    let seq = state.begin_probe();
    Some(ProbeTicket { seq, token })
}

/// Applies a probe outcome. A result from a superseded probe is discarded;
/// the status stored in `state` always reflects the latest dispatched probe.
pub fn apply(
    state: &mut AuthState,
    ticket: ProbeTicket,
    outcome: Result<Option<serde_json::Value>, FetchError>,
) -> ProfileStatus {
    let status = match outcome {
        Ok(Some(_)) => ProfileStatus::Exists,
        Ok(None) => ProfileStatus::Missing,
        Err(e) => {
            debug!("Profile probe indeterminate: {e}");
            ProfileStatus::Unknown
        }
    };
    if !state.finish_probe(ticket.seq, status) {
        debug!("Discarding superseded probe result {status:?}");
    }
    state.profile_status()
}

/// Probes the profile service and updates `state`. Resolves to a status in
/// every case; it never propagates an error.
pub async fn probe(api: &dyn JobBoardApi, state: &mut AuthState) -> ProfileStatus {
    let Some(ticket) = begin(state) else {
        return ProfileStatus::Unknown;
    };
    let outcome = api.get_profile(&ticket.token).await;
    apply(state, ticket, outcome)
}
