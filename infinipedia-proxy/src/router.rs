//! Axum router construction for the proxy.

use axum::Router;
use axum::routing::post;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::ProxyState;

/// Build the proxy router.
///
/// - `POST /api/generate` -- definition stream or art JSON
///
/// CORS allows any origin so browser clients on other hosts can call it.
pub fn build_router(state: ProxyState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/generate", post(handlers::generate))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
