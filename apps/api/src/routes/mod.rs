pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth_handlers;
use crate::jobs::handlers as job_handlers;
use crate::profile::handlers as profile_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/register", post(auth_handlers::register))
        .route("/login", post(auth_handlers::login))
        // Profile (Bearer token required)
        .route(
            "/profile/",
            get(profile_handlers::get_my_profile)
                .post(profile_handlers::create_my_profile)
                .put(profile_handlers::update_my_profile),
        )
        // Job search proxy
        .route("/job/", post(job_handlers::search_jobs))
        .route("/job/:id", get(job_handlers::get_job))
        .with_state(state)
}
