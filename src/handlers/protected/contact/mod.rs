// handlers/protected/contact - contact CRUD
//
// Every handler runs the same short pipeline and bails at the first failing
// stage: parse input -> validate -> persist -> respond.

pub mod contact_delete;
pub mod contact_get;
pub mod contact_post;
pub mod contact_put;
pub mod contacts_get;

pub use contact_delete::contact_delete;
pub use contact_get::contact_get;
pub use contact_post::contact_post;
pub use contact_put::contact_put;
pub use contacts_get::contacts_get;

use axum::{extract::rejection::JsonRejection, Json};

use crate::database::ContactInput;
use crate::error::ApiError;
use crate::middleware::RequestContext;

/// Path ids must be positive integers.
fn parse_contact_id(ctx: &RequestContext, raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => {
            tracing::warn!(request_id = %ctx.request_id, id = %raw, "Invalid contact ID");
            Err(ApiError::bad_request("Invalid contact ID"))
        }
    }
}

fn decode_contact(
    ctx: &RequestContext,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> Result<ContactInput, ApiError> {
    payload.map(|Json(input)| input).map_err(|rejection| {
        tracing::warn!(request_id = %ctx.request_id, error = %rejection.body_text(), "Invalid request body");
        ApiError::from_body_rejection(&rejection)
    })
}
