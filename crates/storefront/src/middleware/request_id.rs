//! Request ID middleware for request tracing and correlation.
//!
//! Uses the `x-request-id` header when an upstream proxy already set one and
//! generates a UUID v4 otherwise. The id is recorded on the request span,
//! tagged on the Sentry scope, exposed to handlers as [`RequestId`], and
//! echoed back in the response headers.

use axum::{
    extract::Request,
    http::{HeaderValue, Method, Uri},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id attached to the request extensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// Span for one request, with an empty `request_id` slot for the middleware.
pub fn make_request_span(request: &Request) -> Span {
    request_span(request.method(), request.uri())
}

fn request_span(method: &Method, uri: &Uri) -> Span {
    tracing::info_span!(
        "request",
        method = %method,
        path = %uri.path(),
        request_id = tracing::field::Empty,
    )
}

fn incoming_request_id(request: &Request) -> Option<String> {
    request
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty() && id.len() <= 128)
        .map(String::from)
}

/// Middleware that ensures every request has a unique request ID.
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = incoming_request_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", request_id.as_str());

    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    request
        .extensions_mut()
        .insert(RequestId(request_id.clone()));

    let mut response = next.run(request).await;

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
