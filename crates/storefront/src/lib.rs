//! Bazaar Storefront library.
//!
//! Server-rendered marketplace storefront: product browsing, store pages,
//! search, cart and checkout, buyer order history, and the seller
//! dashboard. All persistent state lives in the backend REST API; this
//! crate holds only per-browser session state.
//!
//! The router is built here so the binary and the tests share it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod error;
pub mod filters;
pub mod middleware;
pub mod models;
pub mod notifications;
pub mod routes;
pub mod state;

use axum::{Router, middleware::from_fn, middleware::from_fn_with_state, routing::get};
use tower_http::{services::ServeDir, trace::TraceLayer};

use state::AppState;

/// Directory served under `/static`.
pub const STATIC_DIR: &str = "crates/storefront/static";

/// Build the full application router.
///
/// Layers, outermost first: Sentry, request tracing, request id, security
/// headers, session, session rejection.
pub fn app(state: AppState) -> Router {
    let session_layer = middleware::create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(from_fn_with_state(
            state.clone(),
            middleware::session_rejection_middleware,
        ))
        .layer(session_layer)
        .layer(from_fn(middleware::security_headers_middleware))
        .layer(from_fn(middleware::request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(middleware::make_request_span))
        .with_state(state)
        // Sentry layers (outermost for full request coverage)
        .layer(sentry_tower::NewSentryLayer::new_from_top())
        .layer(sentry_tower::SentryHttpLayer::new().enable_transaction())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}
