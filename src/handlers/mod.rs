// handlers/mod.rs - two security tiers
//
// Public (no auth): /login, /health
// Protected (bearer token unless REQUIRE_AUTH=false): /contacts, /contact[/:id]
pub mod protected;
pub mod public;

use crate::error::ApiError;

/// Router fallback so unknown paths get the same error envelope
pub async fn not_found() -> ApiError {
    ApiError::not_found("Not Found")
}

/// Known path, unsupported method
pub async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed("Method Not Allowed".to_string())
}
