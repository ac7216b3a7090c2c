//! Axum router configuration with middleware.
//!
//! Routes: `POST /chat` (rate limited), `GET /health`, and the static
//! front-end from the configured directory (`/` serves `index.html`).
//! Middleware: panic catcher, CORS (any origin), request tracing.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::http::error::panic_response;
use crate::http::handlers;
use crate::http::middleware::rate_limit;
use crate::state::AppState;

/// Build the relay router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat_routes = Router::new()
        .route("/chat", post(handlers::chat::chat))
        .route_layer(middleware::from_fn_with_state(state.clone(), rate_limit));

    let static_dir = state.config.static_dir.clone();
    let index = ServeFile::new(format!("{static_dir}/index.html"));

    Router::new()
        .merge(chat_routes)
        .route("/health", get(handlers::health::health))
        .route_service("/", index)
        .fallback_service(ServeDir::new(&static_dir))
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
