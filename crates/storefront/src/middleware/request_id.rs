//! Request ID helpers for request tracing and correlation.
//!
//! `tower_http`'s request-id layers keep an `x-request-id` supplied by an
//! upstream proxy (e.g., Cloudflare, load balancer) or generate a UUID v4.
//! The helpers here make sure the ID is:
//! - Recorded on the request's tracing span
//! - Added to the Sentry scope for error correlation

use axum::{
    extract::Request,
    http::{HeaderName, Request as HttpRequest},
    middleware::Next,
    response::Response,
};
use tracing::Span;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Header name for the request-id layers.
#[must_use]
pub const fn request_id_header() -> HeaderName {
    HeaderName::from_static(REQUEST_ID_HEADER)
}

fn request_id<B>(request: &HttpRequest<B>) -> &str {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
}

/// Span for one HTTP request, tagged with its request ID.
pub fn make_span<B>(request: &HttpRequest<B>) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id(request),
    )
}

/// Middleware that tags the Sentry scope with the request ID.
///
/// Must run inside `SetRequestIdLayer` so the header is present.
pub async fn sentry_request_id(request: Request, next: Next) -> Response {
    let id = request_id(&request).to_owned();

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &id);
    });

    next.run(request).await
}
