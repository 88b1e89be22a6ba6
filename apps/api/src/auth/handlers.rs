use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::jwt;
use crate::auth::password::{self, MIN_PASSWORD_LEN};
use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct RegisterResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginUser {
    pub username: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: LoginUser,
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    if !password::is_acceptable(&req.password) {
        return Err(AppError::WeakPassword(MIN_PASSWORD_LEN));
    }
    if req.username.trim().is_empty() || req.email.trim().is_empty() {
        return Err(AppError::Validation(
            "username and email are required".to_string(),
        ));
    }

    let existing: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    if existing.is_some() {
        return Err(AppError::Duplicate("User already exists".to_string()));
    }

    let password_hash = password::hash_password(&req.password)?;

    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, role, created_at)
         VALUES (gen_random_uuid(), $1, $2, $3, 'user', now())",
    )
    .bind(&req.username)
    .bind(&req.email)
    .bind(&password_hash)
    .execute(&state.db)
    .await?;

    info!("Registered new user {}", req.email);

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User created successfully".to_string(),
        }),
    ))
}

/// POST /login
///
/// Unknown email and wrong password both return the same 401 so the endpoint
/// cannot be used to enumerate accounts.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(&req.email)
        .fetch_optional(&state.db)
        .await?;

    let user = match user {
        Some(u) if password::verify_password(&req.password, &u.password_hash) => u,
        _ => return Err(AppError::InvalidCredentials),
    };

    let token = jwt::issue(&state.config.jwt_secret, user.id, &user.role)
        .map_err(|e| AppError::Internal(e.into()))?;

    Ok(Json(LoginResponse {
        token,
        user: LoginUser {
            username: user.username,
            email: user.email,
        },
    }))
}
