use sqlx::PgPool;

use crate::config::Config;
use crate::jobs::upstream::JobsClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jobs: JobsClient,
    pub config: Config,
}
