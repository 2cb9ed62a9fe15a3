//! ASN Store storefront library.
//!
//! Serves the single-page store over HTTP: HTMX drives the page, Askama
//! renders the regions, and the cart lives in a JSON file slot. Exposed as a
//! library so the router can be exercised in tests and the CLI can share the
//! file store.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod notice;
pub mod render;
pub mod routes;
pub mod state;
pub mod storage;

use axum::{Router, routing::get};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the storefront router with static assets and request tracing.
pub fn app(state: AppState) -> Router {
    let asset_dir = state.config().asset_dir.clone();

    Router::new()
        .route("/health", get(health))
        .merge(routes::routes())
        .nest_service("/static", ServeDir::new(&asset_dir))
        .nest_service("/images", ServeDir::new(asset_dir.join("images")))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
