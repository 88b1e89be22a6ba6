use thiserror::Error;

/// Failures surfaced by the auth gateway. Everything the service cannot
/// classify (network faults, 5xx, malformed tokens) collapses into
/// `ServiceUnavailable` so the UI always has a message to show.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("an account with this email already exists")]
    DuplicateAccount,

    #[error("password must be at least 6 characters")]
    WeakPassword,

    #[error("authentication service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Failures surfaced by profile create/update calls.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("profile validation failed: {0}")]
    ValidationFailed(String),

    #[error("not signed in")]
    Unauthorized,

    #[error("no profile exists yet")]
    NotFound,

    #[error("a profile already exists")]
    AlreadyExists,

    #[error("profile service unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Generic listing/probe failure. The job feed shows the message and stops
/// paginating; the profile prober maps it to `ProfileStatus::Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("failed to fetch: {0}")]
    Failed(String),
}
