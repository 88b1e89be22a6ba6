use axum::{extract::State, http::StatusCode, Json};
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use crate::auth::extract::AuthUser;
use crate::errors::AppError;
use crate::profile::models::{ProfileInput, ProfileRow};
use crate::profile::validation::validate_profile;
use crate::state::AppState;

/// GET /profile/
///
/// 404 here is load-bearing: the client's profile prober maps it to
/// "profile missing" and gates the user to the completion form.
pub async fn get_my_profile(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let row: Option<ProfileRow> = sqlx::query_as("SELECT * FROM profile WHERE user_id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;

    let row = row.ok_or_else(|| AppError::NotFound("Profile not found for this user".to_string()))?;

    let mut body = serde_json::to_value(&row).map_err(|e| AppError::Internal(e.into()))?;
    body["recommendations"] = Value::Array(row.normalized_recommendations());
    Ok(Json(body))
}

/// POST /profile/
pub async fn create_my_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let report = validate_profile(&input);
    if !report.passed {
        return Err(AppError::Validation(report.message()));
    }

    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT user_id FROM profile WHERE user_id = $1")
        .bind(user.id)
        .fetch_optional(&state.db)
        .await?;
    if existing.is_some() {
        return Err(AppError::Duplicate(
            "Profile already exists for this user".to_string(),
        ));
    }

    sqlx::query(
        "INSERT INTO profile (user_id, full_name, dob, gender, mobile_number, city,
             highest_qualification, occupation, work_experience, interests,
             profile_picture, recommendations)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
    )
    .bind(user.id)
    .bind(&input.full_name)
    .bind(input.dob)
    .bind(&input.gender)
    .bind(&input.mobile_number)
    .bind(&input.city)
    .bind(&input.highest_qualification)
    .bind(&input.occupation)
    .bind(&input.work_experience)
    .bind(&input.interests)
    .bind(&input.profile_picture)
    .bind(Value::Array(input.recommendations.clone()))
    .execute(&state.db)
    .await?;

    info!("Created profile for user {}", user.id);

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Profile created successfully" })),
    ))
}

/// PUT /profile/
pub async fn update_my_profile(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<Value>, AppError> {
    let report = validate_profile(&input);
    if !report.passed {
        return Err(AppError::Validation(report.message()));
    }

    let result = sqlx::query(
        "UPDATE profile
         SET full_name = $1, dob = $2, gender = $3, mobile_number = $4, city = $5,
             highest_qualification = $6, occupation = $7, work_experience = $8,
             interests = $9, profile_picture = $10, recommendations = $11
         WHERE user_id = $12",
    )
    .bind(&input.full_name)
    .bind(input.dob)
    .bind(&input.gender)
    .bind(&input.mobile_number)
    .bind(&input.city)
    .bind(&input.highest_qualification)
    .bind(&input.occupation)
    .bind(&input.work_experience)
    .bind(&input.interests)
    .bind(&input.profile_picture)
    .bind(Value::Array(input.recommendations.clone()))
    .bind(user.id)
    .execute(&state.db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound(
            "Profile not found for this user".to_string(),
        ));
    }

    Ok(Json(serde_json::json!({
        "message": "Profile updated successfully"
    })))
}
