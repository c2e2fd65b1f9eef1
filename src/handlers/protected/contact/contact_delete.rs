use axum::extract::{Path, State};

use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

use super::parse_contact_id;

/// DELETE /contact/:id - remove a contact, 204 whether or not it existed
pub async fn contact_delete(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_contact_id(&ctx, &id)?;

    let rows = state.store.delete(id).await.map_err(|e| {
        tracing::error!(request_id = %ctx.request_id, operation = "delete", id, error = %e, "Failed to delete contact");
        ApiError::internal_server_error("Failed to delete contact")
    })?;

    if rows == 0 {
        tracing::warn!(request_id = %ctx.request_id, id, "Delete matched no contact");
    } else {
        tracing::info!(request_id = %ctx.request_id, id, "Contact deleted");
    }

    Ok(ApiResponse::no_content())
}
