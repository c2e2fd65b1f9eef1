use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};

use crate::database::ContactInput;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;
use crate::validation::validate_contact;

use super::{decode_contact, parse_contact_id};

/// PUT /contact/:id - overwrite name and email
///
/// Answers 200 even when no row has this id; the miss is only logged.
pub async fn contact_put(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> ApiResult<()> {
    let id = parse_contact_id(&ctx, &id)?;
    let input = decode_contact(&ctx, payload)?;

    validate_contact(&input).map_err(|e| {
        tracing::warn!(request_id = %ctx.request_id, id, field = e.field, rule = %e.rule, "Validation failed");
        ApiError::from(e)
    })?;

    let contact = input.into_contact(id);
    let rows = state.store.update(&contact).await.map_err(|e| {
        tracing::error!(request_id = %ctx.request_id, operation = "update", id, error = %e, "Failed to update contact");
        ApiError::internal_server_error("Failed to update contact")
    })?;

    if rows == 0 {
        tracing::warn!(request_id = %ctx.request_id, id, "Update matched no contact");
    } else {
        tracing::info!(
            request_id = %ctx.request_id,
            id,
            name = %contact.name,
            email = %contact.email,
            "Contact updated"
        );
    }

    Ok(ApiResponse::ok())
}
