//! Route modules and the assembled router.

pub mod applications;
pub mod health;
pub mod whitelist;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Builds the full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(health::router())
        .nest("/api/whitelist", whitelist::router())
        .nest("/api/v1/applications", applications::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
