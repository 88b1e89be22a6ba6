use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Session tokens expire after one hour; the client persists them alongside
/// the derived claims and treats an expired record as a missing session.
const TOKEN_TTL_HOURS: i64 = 1;

/// Claims carried in every session token. The client decodes `id` and `role`
/// from the payload without a network round-trip, so both are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub id: Uuid,
    pub role: String,
    pub exp: i64,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("Failed to sign token: {0}")]
    Sign(jsonwebtoken::errors::Error),

    #[error("Invalid or expired token")]
    Invalid,
}

/// Signs a new HS256 session token for the given user.
pub fn issue(secret: &str, user_id: Uuid, role: &str) -> Result<String, TokenError> {
    let claims = Claims {
        id: user_id,
        role: role.to_string(),
        exp: (Utc::now() + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Sign)
}

/// Verifies a token's signature and expiry and returns its claims.
pub fn verify(secret: &str, token: &str) -> Result<Claims, TokenError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| TokenError::Invalid)
}
