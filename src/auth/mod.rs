use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

/// Tokens are valid for exactly one hour after issuance.
pub const TOKEN_TTL_SECONDS: i64 = 60 * 60;

/// Login request body
#[derive(Debug, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub username: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(username: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            username: username.into(),
            exp: (issued_at + Duration::seconds(TOKEN_TTL_SECONDS)).timestamp(),
            iat: issued_at.timestamp(),
        }
    }
}

/// A freshly minted bearer token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub claims: Claims,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing Authorization header")]
    MissingToken,

    #[error("Authorization header must use Bearer token format")]
    MalformedHeader,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication is not configured")]
    NotConfigured,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Compare the submitted credentials against the configured pair.
///
/// Fails closed: an unset or empty username or password rejects everyone.
pub fn verify_credentials(config: &SecurityConfig, creds: &Credentials) -> Result<(), AuthError> {
    let (user, password) = match (config.app_user.as_deref(), config.app_password.as_deref()) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => return Err(AuthError::NotConfigured),
    };

    let user_ok = constant_time_eq(creds.username.as_bytes(), user.as_bytes());
    let password_ok = constant_time_eq(creds.password.as_bytes(), password.as_bytes());
    if user_ok && password_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Sign a token for `username`, valid for one hour from `issued_at`.
pub fn generate_jwt(
    config: &SecurityConfig,
    username: &str,
    issued_at: DateTime<Utc>,
) -> Result<IssuedToken, AuthError> {
    let secret = config.signing_secret().ok_or(AuthError::NotConfigured)?;

    let claims = Claims::new(username, issued_at);
    let token = encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AuthError::Signing(e.to_string()))?;

    Ok(IssuedToken { token, claims })
}

/// Verify signature and expiry, returning the embedded claims.
pub fn validate_jwt(config: &SecurityConfig, token: &str) -> Result<Claims, AuthError> {
    let secret = config.signing_secret().ok_or(AuthError::NotConfigured)?;

    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
}

/// Pull the token out of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.ok_or(AuthError::MissingToken)?;
    let (scheme, token) = value.split_once(' ').ok_or(AuthError::MalformedHeader)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedHeader);
    }
    let token = token.trim();
    if token.is_empty() {
        return Err(AuthError::MalformedHeader);
    }
    Ok(token)
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
