use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Serialize;

use crate::database::ContactInput;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;
use crate::validation::validate_contact;

use super::decode_contact;

#[derive(Debug, Serialize)]
pub struct CreatedContact {
    pub id: i64,
}

/// POST /contact - create a contact, responding 201 with its new id
pub async fn contact_post(
    State(state): State<AppState>,
    ctx: RequestContext,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult<CreatedContact> {
    let input = decode_contact(&ctx, payload)?;

    validate_contact(&input).map_err(|e| {
        tracing::warn!(request_id = %ctx.request_id, field = e.field, rule = %e.rule, "Validation failed");
        ApiError::from(e)
    })?;

    let id = state.store.insert(&input).await.map_err(|e| {
        tracing::error!(request_id = %ctx.request_id, operation = "insert", error = %e, "Failed to create contact");
        ApiError::internal_server_error("Failed to create contact")
    })?;

    tracing::info!(request_id = %ctx.request_id, id, name = %input.name, email = %input.email, "Contact created");

    Ok(ApiResponse::created(CreatedContact { id }))
}
