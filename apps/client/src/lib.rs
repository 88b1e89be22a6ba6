//! Client-side session, gating, and job-feed logic for the Rozgar job board.
//!
//! The backend in `apps/api` exposes login/registration, profile CRUD, and a
//! job-search proxy. This crate owns everything the UI shell needs on top of
//! that surface:
//!
//! - [`session`]: persisting the authenticated identity across restarts and
//!   the shared [`session::AuthState`] container,
//! - [`auth`]: credential exchange with typed failures,
//! - [`profile`]: the tri-state profile-existence prober,
//! - [`gate`]: route-gating decisions (login-required, profile-required,
//!   redirect-if-authenticated),
//! - [`feed`]: the filtered, infinite-scroll paginated job feed.
//!
//! All network traffic goes through the [`api::JobBoardApi`] trait so the
//! state machines are testable without a server.

pub mod api;
pub mod auth;
pub mod error;
pub mod feed;
pub mod gate;
pub mod identity;
pub mod profile;
pub mod session;

pub use api::{HttpApi, JobBoardApi};
pub use error::{AuthError, FetchError, ProfileError};
pub use gate::GateDecision;
pub use identity::{Identity, Role};
pub use profile::ProfileStatus;
pub use session::{AuthState, SessionStore};
