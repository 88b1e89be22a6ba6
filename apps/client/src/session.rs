//! Session persistence and the shared authentication state container.

use std::path::PathBuf;
use std::sync::Mutex;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::identity::{Identity, Role};
use crate::profile::ProfileStatus;

/// Sessions persist for seven days from the last save.
const SESSION_TTL_DAYS: i64 = 7;

/// What actually lands on disk: the token, the derived claims, and when the
/// whole record stops being trusted.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    token: String,
    role: Role,
    subject_id: String,
    expires_at: DateTime<Utc>,
}

/// Storage backend for the persisted session. The file-backed implementation
/// is the real one; tests use [`MemoryDisk`].
pub trait TokenDisk: Send + Sync {
    fn read(&self) -> Option<String>;
    fn write(&self, contents: &str) -> std::io::Result<()>;
    fn remove(&self) -> std::io::Result<()>;
}

/// Stores the session under the platform data directory
/// (`<data_local_dir>/rozgar/session.json` by default).
pub struct FileDisk {
    path: PathBuf,
}

impl FileDisk {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("rozgar")
            .join("session.json")
    }
}

impl Default for FileDisk {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl TokenDisk for FileDisk {
    fn read(&self) -> Option<String> {
        std::fs::read_to_string(&self.path).ok()
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, contents)
    }

    fn remove(&self) -> std::io::Result<()> {
        match std::fs::remove_file(&self.path) {
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// In-memory disk for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryDisk {
    cell: Mutex<Option<String>>,
}

impl TokenDisk for MemoryDisk {
    fn read(&self) -> Option<String> {
        self.cell.lock().expect("memory disk poisoned").clone()
    }

    fn write(&self, contents: &str) -> std::io::Result<()> {
        *self.cell.lock().expect("memory disk poisoned") = Some(contents.to_string());
        Ok(())
    }

    fn remove(&self) -> std::io::Result<()> {
        *self.cell.lock().expect("memory disk poisoned") = None;
        Ok(())
    }
}

/// Persists the identity across restarts. A malformed, expired, or missing
/// record always reads as "no session" rather than an error.
pub struct SessionStore<D: TokenDisk> {
    disk: D,
}

impl Default for SessionStore<FileDisk> {
    fn default() -> Self {
        Self::new(FileDisk::default())
    }
}

impl<D: TokenDisk> SessionStore<D> {
    pub fn new(disk: D) -> Self {
        Self { disk }
    }

    /// Reads the persisted identity, if a live one exists.
    pub fn load(&self) -> Option<Identity> {
        let raw = self.disk.read()?;
        let session: PersistedSession = serde_json::from_str(&raw).ok()?;
        if session.expires_at <= Utc::now() {
            debug!("Persisted session expired, treating as absent");
            return None;
        }
        Some(Identity {
            subject_id: session.subject_id,
            role: session.role,
            token: session.token,
        })
    }

    /// Persists the identity with a fresh expiry, overwriting any prior value.
    pub fn save(&self, identity: &Identity) -> std::io::Result<()> {
        let session = PersistedSession {
            token: identity.token.clone(),
            role: identity.role,
            subject_id: identity.subject_id.clone(),
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        };
        let contents =
            serde_json::to_string(&session).expect("session serialization cannot fail");
        self.disk.write(&contents)
    }

    /// Removes the persisted session. Idempotent.
    pub fn clear(&self) {
        if let Err(e) = self.disk.remove() {
            debug!("Failed to remove persisted session: {e}");
        }
    }
}

/// The application-wide authentication state: who is signed in, whether a
/// profile exists for them, and where to send them after login.
///
/// This is an explicit container handed to the gates and the prober; nothing
/// in this crate reads ambient global state.
#[derive(Debug, Default)]
pub struct AuthState {
    identity: Option<Identity>,
    profile_status: ProfileStatus,
    /// Sequence number of the most recently dispatched probe.
    probe_seq: u64,
    /// Sequence number of the most recently applied probe result.
    probe_applied: u64,
    return_to: Option<String>,
}

impl AuthState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores state from a session store at startup.
    pub fn restore<D: TokenDisk>(store: &SessionStore<D>) -> Self {
        Self {
            identity: store.load(),
            ..Self::default()
        }
    }

    pub fn identity(&self) -> Option<&Identity> {
        self.identity.as_ref()
    }

    pub fn profile_status(&self) -> ProfileStatus {
        self.profile_status
    }

    /// True while a dispatched probe has not yet been applied or superseded.
    pub fn is_probing(&self) -> bool {
        self.probe_seq > self.probe_applied
    }

    pub fn sign_in(&mut self, identity: Identity) {
        self.identity = Some(identity);
        self.profile_status = ProfileStatus::Unknown;
    }

    pub fn sign_out(&mut self) {
        self.identity = None;
        self.profile_status = ProfileStatus::Unknown;
        // Superseded: any in-flight probe result must not resurrect state.
        self.probe_applied = self.probe_seq;
    }

    /// Remembers where a gated navigation wanted to go, for post-login return.
    pub fn remember_path(&mut self, path: &str) {
        self.return_to = Some(path.to_string());
    }

    pub fn take_return_path(&mut self) -> Option<String> {
        self.return_to.take()
    }

    /// Explicit transition used right after a successful profile creation,
    /// instead of re-probing over the network.
    pub fn mark_profile_created(&mut self) {
        self.profile_status = ProfileStatus::Exists;
        self.probe_applied = self.probe_seq;
    }

    pub(crate) fn begin_probe(&mut self) -> u64 {
        self.probe_seq += 1;
        self.probe_seq
    }

    /// Applies a probe result if no newer probe has been dispatched since.
    /// Returns whether the result was applied (last-write-wins).
    pub(crate) fn finish_probe(&mut self, seq: u64, status: ProfileStatus) -> bool {
        if seq < self.probe_seq || seq <= self.probe_applied {
            return false;
        }
        self.probe_applied = seq;
        self.profile_status = status;
        true
    }
}
