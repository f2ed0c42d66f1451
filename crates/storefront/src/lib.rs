//! Saleor storefront library.
//!
//! This crate provides the storefront backend as a library, allowing it to
//! be tested and reused. The binary in `main.rs` only adds process setup
//! (Sentry, tracing subscriber, signal handling).

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod saleor;
pub mod state;
pub mod webhooks;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::state::AppState;

/// Build the application router with tracing and request-id layers.
///
/// Sentry layers are added by the binary, outside this router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .layer(axum::middleware::from_fn(middleware::sentry_request_id))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(
                    middleware::request_id_header(),
                    MakeRequestUuid,
                ))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(middleware::make_span::<axum::body::Body>),
                )
                .layer(PropagateRequestIdLayer::new(middleware::request_id_header())),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check Saleor.
async fn health() -> &'static str {
    "ok"
}
