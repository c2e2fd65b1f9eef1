use axum::extract::{rejection::QueryRejection, Query, State};

use crate::database::{Contact, ListQuery};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, RequestContext};
use crate::state::AppState;

/// GET /contacts?page=&limit=&name= - one page of contacts, oldest first
///
/// Missing, non-numeric or non-positive `page`/`limit` fall back to 1 and 10.
/// `name` keeps only contacts whose name contains it, ignoring ASCII case.
pub async fn contacts_get(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Vec<Contact>> {
    // an undecodable query string lists with defaults rather than failing
    let query = query.map(|Query(q)| q).unwrap_or_default();
    let pagination = query.pagination(state.config.api.max_page_size);

    let contacts = state
        .store
        .list(pagination, query.name_filter())
        .await
        .map_err(|e| {
            tracing::error!(request_id = %ctx.request_id, operation = "list", error = %e, "Error fetching contacts");
            ApiError::internal_server_error("Error fetching contacts")
        })?;

    tracing::info!(
        request_id = %ctx.request_id,
        count = contacts.len(),
        page = pagination.page,
        limit = pagination.limit,
        "Retrieved contacts"
    );

    Ok(ApiResponse::success(contacts))
}
