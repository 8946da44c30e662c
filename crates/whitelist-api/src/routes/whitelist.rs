//! Game-server lookup endpoints.
//!
//! Unknown identifiers answer `whitelisted: false`; blank ones are a client
//! error.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Json, Router, routing::get};
use serde::Serialize;
use tracing::{debug, instrument};

use whitelist_applications::application::query_handlers;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /game-id/{id}.
#[derive(Debug, Serialize)]
pub struct GameIdLookupResponse {
    /// Whether an approved application carries this game identifier.
    pub whitelisted: bool,
    /// Account id recorded with the game identifier, if any.
    pub external_account_id: Option<String>,
}

/// Response for GET /external-id/{id}.
#[derive(Debug, Serialize)]
pub struct ExternalIdLookupResponse {
    /// Whether an approved application carries this account id.
    pub whitelisted: bool,
    /// Game identifier recorded with the account id, if any.
    pub game_identifier: Option<String>,
}

/// GET /game-id/{game_identifier}
#[instrument(skip(state))]
async fn lookup_by_game_id(
    State(state): State<AppState>,
    Path(game_identifier): Path<String>,
) -> Result<Json<GameIdLookupResponse>, ApiError> {
    let lookup =
        query_handlers::lookup_game_identifier(&game_identifier, state.repository.as_ref()).await?;
    debug!(whitelisted = lookup.whitelisted, "game identifier looked up");

    Ok(Json(GameIdLookupResponse {
        whitelisted: lookup.whitelisted,
        external_account_id: lookup.counterpart,
    }))
}

/// GET /external-id/{external_account_id}
#[instrument(skip(state))]
async fn lookup_by_external_id(
    State(state): State<AppState>,
    Path(external_account_id): Path<String>,
) -> Result<Json<ExternalIdLookupResponse>, ApiError> {
    let lookup =
        query_handlers::lookup_external_account_id(&external_account_id, state.repository.as_ref())
            .await?;
    debug!(whitelisted = lookup.whitelisted, "external account id looked up");

    Ok(Json(ExternalIdLookupResponse {
        whitelisted: lookup.whitelisted,
        game_identifier: lookup.counterpart,
    }))
}

/// Response for GET /check/{id}.
#[derive(Debug, Serialize)]
pub struct CheckResponse {
    /// Whether an approved application carries this identifier in either
    /// identifier space.
    pub whitelisted: bool,
}

/// GET /check/{identifier}
#[instrument(skip(state))]
async fn check_identifier(
    State(state): State<AppState>,
    Path(identifier): Path<String>,
) -> Result<Json<CheckResponse>, ApiError> {
    let whitelisted =
        query_handlers::check_identifier(&identifier, state.repository.as_ref()).await?;
    debug!(whitelisted, "identifier checked");

    Ok(Json(CheckResponse { whitelisted }))
}

/// GET /approved
///
/// One approved game identifier per line, ascending.
#[instrument(skip(state))]
async fn list_approved(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let identifiers = query_handlers::list_approved(state.repository.as_ref()).await?;
    let mut body = identifiers.join("\n");
    if !body.is_empty() {
        body.push('\n');
    }

    Ok(([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body))
}

/// Returns the router for the lookup endpoints.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/game-id/{game_identifier}", get(lookup_by_game_id))
        .route("/external-id/{external_account_id}", get(lookup_by_external_id))
        .route("/check/{identifier}", get(check_identifier))
        .route("/approved", get(list_approved))
}
