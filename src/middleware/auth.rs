use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::auth::{bearer_token, validate_jwt, AuthError, Claims};
use crate::error::ApiError;
use crate::middleware::request_id::RequestContext;
use crate::state::AppState;

/// Identity proven by a verified bearer token
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub username: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            username: claims.username,
        }
    }
}

/// JWT authentication middleware that validates tokens and attaches the
/// verified user to the request
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let request_id = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.request_id.clone())
        .unwrap_or_default();

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .map(|v| v.to_str().map_err(|_| AuthError::MalformedHeader))
        .transpose();

    let claims = header
        .and_then(bearer_token)
        .and_then(|token| validate_jwt(&state.config.security, token))
        .map_err(|e| {
            tracing::warn!(request_id = %request_id, reason = %e, "Rejected unauthenticated request");
            ApiError::from(e)
        })?;

    request.extensions_mut().insert(AuthUser::from(claims));

    Ok(next.run(request).await)
}
