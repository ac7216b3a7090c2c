//! HTTP layer for chatrelay.
//!
//! Axum-based relay: `POST /chat`, `GET /health`, and the static front-end,
//! with CORS open to all origins and per-address rate limiting on `/chat`.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
