use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

/// The authenticated user: the opaque session token plus the claims derived
/// from it. Held by the session store for the lifetime of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub subject_id: String,
    pub role: Role,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClaimsError {
    #[error("token is not a three-segment JWT")]
    NotAJwt,

    #[error("token payload is not valid base64 JSON")]
    Undecodable,

    #[error("token payload is missing required claims (id, role)")]
    MissingClaims,
}

/// Claims read out of the token payload without verifying the signature.
/// The backend is the only party that verifies; the client just needs the
/// subject id and role to drive gating and display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub id: String,
    pub role: Role,
    pub exp: Option<i64>,
}

#[derive(Deserialize)]
struct RawClaims {
    id: Option<Value>,
    role: Option<String>,
    exp: Option<i64>,
}

/// Decodes the middle segment of a self-contained token.
pub fn decode_claims(token: &str) -> Result<Claims, ClaimsError> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_)) => payload,
        _ => return Err(ClaimsError::NotAJwt),
    };
    if segments.next().is_some() {
        return Err(ClaimsError::NotAJwt);
    }

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ClaimsError::Undecodable)?;
    let raw: RawClaims = serde_json::from_slice(&bytes).map_err(|_| ClaimsError::Undecodable)?;

    let id = match raw.id {
        Some(Value::String(s)) if !s.is_empty() => s,
        // Numeric subject ids from older backends are stringified.
        Some(Value::Number(n)) => n.to_string(),
        _ => return Err(ClaimsError::MissingClaims),
    };
    let role = match raw.role.as_deref() {
        Some("user") => Role::User,
        Some("admin") => Role::Admin,
        _ => return Err(ClaimsError::MissingClaims),
    };

    Ok(Claims {
        id,
        role,
        exp: raw.exp,
    })
}

impl Identity {
    /// Builds an identity by inspecting the token payload. No network call.
    pub fn from_token(token: &str) -> Result<Self, ClaimsError> {
        let claims = decode_claims(token)?;
        Ok(Identity {
            subject_id: claims.id,
            role: claims.role,
            token: token.to_string(),
        })
    }
}
