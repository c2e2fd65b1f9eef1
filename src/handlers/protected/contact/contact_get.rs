use axum::extract::{Path, State};

use crate::database::Contact;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

use super::parse_contact_id;

/// GET /contact/:id - show a single contact
pub async fn contact_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<Contact> {
    let id = parse_contact_id(&ctx, &id)?;

    let contact = state.store.find(id).await.map_err(|e| {
        tracing::error!(request_id = %ctx.request_id, operation = "find", id, error = %e, "Error fetching contact");
        ApiError::internal_server_error("Error fetching contact")
    })?;

    match contact {
        Some(contact) => Ok(ApiResponse::success(contact)),
        None => {
            tracing::info!(request_id = %ctx.request_id, id, "Contact not found");
            Err(ApiError::not_found("Contact not found"))
        }
    }
}
