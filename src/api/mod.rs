//! REST API for schedule inspection and evaluation.
//!
//! Provides two GET endpoints:
//! - `/schedules` — every schedule object in the loaded document
//! - `/values` — hourly values for one named schedule and year

mod handlers;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::get;

use crate::document::Document;
use crate::schedule::EvalOptions;

/// Immutable application state shared across all request handlers.
///
/// Constructed once from the loaded document and wrapped in `Arc` — no
/// locks needed since evaluation only reads.
pub struct AppState {
    /// The loaded model document.
    pub document: Document,
    /// Default evaluation year when the query omits one.
    pub year: i32,
    /// Evaluation options applied to every request.
    pub options: EvalOptions,
}

/// Builds the axum router with all API routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/schedules", get(handlers::get_schedules))
        .route("/values", get(handlers::get_values))
        .with_state(state)
}

/// Binds to the given address and serves the API.
///
/// # Panics
///
/// Panics if the TCP listener cannot bind to `addr`.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind to {addr}: {e}"));
    eprintln!("API server listening on http://{addr}");
    axum::serve(listener, app)
        .await
        .unwrap_or_else(|e| panic!("server error: {e}"));
}
