use std::convert::Infallible;

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request},
    http::{request::Parts, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

const MAX_INBOUND_ID_LENGTH: usize = 128;

/// Per-request correlation data, created by [`request_id_middleware`] and
/// handed to every handler that logs.
#[derive(Clone, Debug)]
pub struct RequestContext {
    pub request_id: String,
}

impl RequestContext {
    pub fn generate() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
        }
    }

    /// Reuse a caller-supplied id when it is short visible ASCII.
    fn from_inbound(value: Option<&HeaderValue>) -> Self {
        value
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|id| {
                !id.is_empty()
                    && id.len() <= MAX_INBOUND_ID_LENGTH
                    && id.bytes().all(|b| b.is_ascii_graphic())
            })
            .map(|id| Self {
                request_id: id.to_string(),
            })
            .unwrap_or_else(Self::generate)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .unwrap_or_else(RequestContext::generate))
    }
}

/// Assigns a request id, opens a span carrying it for the rest of the chain
/// and echoes it back in `x-request-id`.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let ctx = RequestContext::from_inbound(req.headers().get(&REQUEST_ID_HEADER));
    req.extensions_mut().insert(ctx.clone());

    let span = tracing::info_span!(
        "request",
        request_id = %ctx.request_id,
        method = %req.method(),
        uri = %req.uri(),
    );

    async move {
        tracing::info!("Request started");
        let mut response = next.run(req).await;
        if let Ok(value) = HeaderValue::from_str(&ctx.request_id) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        tracing::info!(status = %response.status(), "Request completed");
        response
    }
    .instrument(span)
    .await
}
