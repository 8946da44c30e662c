//! Liveness endpoint.

use axum::extract::State;
use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Liveness response, with the optional features this instance runs with.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` when the server answers.
    pub status: &'static str,
    /// Crate version.
    pub version: &'static str,
    /// Whether PC submissions are checked against Steam.
    pub profile_verification: bool,
    /// Whether the `needs_fix` decision is available.
    pub needs_fix_enabled: bool,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        profile_verification: state.verifier.is_some(),
        needs_fix_enabled: state.lifecycle.needs_fix_enabled,
    })
}

/// Returns the health check router.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
