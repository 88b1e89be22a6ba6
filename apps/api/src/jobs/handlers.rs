use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::errors::AppError;
use crate::jobs::upstream::SearchFilters;
use crate::state::AppState;

/// POST /job/
///
/// Proxies a filtered, paginated search to the upstream job API and returns
/// its `Data` payload (`{ Results: [...] }`) unchanged.
pub async fn search_jobs(
    State(state): State<AppState>,
    Json(filters): Json<SearchFilters>,
) -> Result<Json<Value>, AppError> {
    let data = state
        .jobs
        .search(&filters)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;
    Ok(Json(data))
}

/// GET /job/:id
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let job = state
        .jobs
        .job(&id)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    match job {
        Some(job) => Ok(Json(job)),
        None => Err(AppError::NotFound(format!("Job {id} not found"))),
    }
}
