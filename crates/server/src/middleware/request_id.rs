//! Request correlation IDs.
//!
//! Each request carries an `x-request-id`, either forwarded by a proxy or
//! minted here. It is attached to the `http_request` span, tagged on the
//! Sentry scope and echoed on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reuse a non-empty, printable incoming ID or mint a UUID v4.
fn resolve(headers: &HeaderMap) -> HeaderValue {
    headers
        .get(REQUEST_ID_HEADER)
        .filter(|v| !v.is_empty() && v.to_str().is_ok())
        .cloned()
        .unwrap_or_else(|| {
            HeaderValue::from_str(&Uuid::new_v4().to_string())
                .unwrap_or_else(|_| HeaderValue::from_static("unknown"))
        })
}

/// Middleware that ensures every request and response has a request ID.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id = resolve(request.headers());
    let id = request_id.to_str().unwrap_or_default();

    Span::current().record("request_id", id);
    sentry::configure_scope(|scope| scope.set_tag("request_id", id));

    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(REQUEST_ID_HEADER, request_id);
    response
}
