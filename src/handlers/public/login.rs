// handlers/public/login.rs - POST /login handler

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;

use crate::auth::{generate_jwt, verify_credentials, AuthError, Credentials, TOKEN_TTL_SECONDS};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
}

/// POST /login - exchange the configured username/password for a bearer token
///
/// Expected Input:
/// ```json
/// { "username": "string", "password": "string" }
/// ```
///
/// Expected Output (Success):
/// ```json
/// { "token": "eyJhbGciOiJIUzI1NiI...", "expires_in": 3600 }
/// ```
///
/// 400 on an undecodable body, 413 on an oversized one, 401 on a credential mismatch or when no
/// credentials are configured, 500 if signing fails.
pub async fn login(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> ApiResult<LoginResponse> {
    let Json(creds) = payload.map_err(|rejection| {
        tracing::warn!(request_id = %ctx.request_id, error = %rejection.body_text(), "Invalid request body");
        ApiError::from_body_rejection(&rejection)
    })?;

    let security = &state.config.security;

    if let Err(e) = verify_credentials(security, &creds) {
        match e {
            AuthError::NotConfigured => {
                tracing::error!(request_id = %ctx.request_id, "Login rejected: APP_USER/APP_PASSWORD not configured")
            }
            _ => tracing::warn!(request_id = %ctx.request_id, username = %creds.username, "Login failed"),
        }
        return Err(e.into());
    }

    let issued = generate_jwt(security, &creds.username, Utc::now()).map_err(|e| {
        tracing::error!(request_id = %ctx.request_id, error = %e, "Failed to issue token");
        match e {
            // fail closed without a signing key
            AuthError::NotConfigured => ApiError::unauthorized("Unauthorized"),
            other => other.into(),
        }
    })?;

    tracing::info!(
        request_id = %ctx.request_id,
        username = %issued.claims.username,
        expires_at = issued.claims.exp,
        "Login succeeded"
    );

    Ok(ApiResponse::success(LoginResponse {
        token: issued.token,
        expires_in: TOKEN_TTL_SECONDS,
    }))
}
