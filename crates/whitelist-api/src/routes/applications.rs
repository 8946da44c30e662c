//! Routes for the application lifecycle, consumed by the chat bot.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use whitelist_applications::application::command_handlers;
use whitelist_applications::application::query_handlers::{
    self, ApplicationView, PlaytimeReport,
};
use whitelist_applications::domain::commands::{self, Decision, ProfileSubmission};
use whitelist_core::model::ApplicationStatus;

use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the acting administrator's identity.
pub const ACTOR_HEADER: &str = "x-actor-id";

/// Request body for POST / and POST /{id}/resubmit.
#[derive(Debug, Deserialize)]
pub struct ApplicationRequest {
    /// The submitting chat user.
    pub submitter_id: i64,
    /// The profile as typed.
    #[serde(flatten)]
    pub profile: ProfileSubmission,
}

/// Request body for POST /{id}/decision.
#[derive(Debug, Deserialize)]
pub struct DecisionRequest {
    /// `approved`, `rejected` or `needs_fix` (verbs are accepted too).
    pub decision: String,
    /// Optional rationale; ignored for approvals.
    #[serde(default)]
    pub comment: Option<String>,
}

/// Query string for GET /.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Optional status filter.
    pub status: Option<String>,
    /// Page size.
    pub limit: Option<u32>,
    /// Records to skip.
    pub offset: Option<u32>,
}

/// Resolves the actor header and checks it against the allow-list.
fn authorized_actor(state: &AppState, headers: &HeaderMap) -> Result<i64, ApiError> {
    let actor_id = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or_else(|| {
            ApiError::BadRequest(format!("missing or malformed {ACTOR_HEADER} header"))
        })?;

    if !state.authorization.is_authorized_decider(actor_id) {
        info!(actor_id, "actor is not allowed to decide applications");
        return Err(ApiError::Forbidden(format!(
            "actor {actor_id} may not decide applications"
        )));
    }
    Ok(actor_id)
}

/// POST /
#[instrument(skip(state, request), fields(submitter_id = request.submitter_id))]
async fn submit(
    State(state): State<AppState>,
    Json(request): Json<ApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationView>), ApiError> {
    let command = commands::SubmitApplication {
        correlation_id: Uuid::new_v4(),
        submitter_id: request.submitter_id,
        profile: request.profile,
    };

    info!(correlation_id = %command.correlation_id, "handling submit_application command");

    let application =
        command_handlers::handle_submit_application(&command, &state.lifecycle_services()).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApplicationView::new(application, &state.lifecycle)),
    ))
}

/// POST /{application_id}/resubmit
#[instrument(skip(state, request), fields(submitter_id = request.submitter_id))]
async fn resubmit(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    Json(request): Json<ApplicationRequest>,
) -> Result<Json<ApplicationView>, ApiError> {
    let command = commands::ResubmitApplication {
        correlation_id: Uuid::new_v4(),
        application_id,
        submitter_id: request.submitter_id,
        profile: request.profile,
    };

    info!(correlation_id = %command.correlation_id, "handling resubmit_application command");

    let application =
        command_handlers::handle_resubmit_application(&command, &state.lifecycle_services())
            .await?;

    Ok(Json(ApplicationView::new(application, &state.lifecycle)))
}

/// POST /{application_id}/decision
#[instrument(skip(state, headers, request))]
async fn decide(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    headers: HeaderMap,
    Json(request): Json<DecisionRequest>,
) -> Result<Json<ApplicationView>, ApiError> {
    let decider_id = authorized_actor(&state, &headers)?;
    let decision: Decision = request.decision.parse()?;

    let command = commands::DecideApplication {
        correlation_id: Uuid::new_v4(),
        application_id,
        decision,
        comment: request.comment,
        decider_id,
    };

    info!(correlation_id = %command.correlation_id, "handling decide_application command");

    let application =
        command_handlers::handle_decide_application(&command, &state.lifecycle_services()).await?;

    Ok(Json(ApplicationView::new(application, &state.lifecycle)))
}

/// GET /{application_id}
#[instrument(skip(state))]
async fn get_application(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
) -> Result<Json<ApplicationView>, ApiError> {
    let view = query_handlers::get_application(
        application_id,
        state.repository.as_ref(),
        &state.lifecycle,
    )
    .await?;
    Ok(Json(view))
}

/// GET /{application_id}/playtime
#[instrument(skip(state, headers))]
async fn get_playtime(
    State(state): State<AppState>,
    Path(application_id): Path<i64>,
    headers: HeaderMap,
) -> Result<Json<PlaytimeReport>, ApiError> {
    authorized_actor(&state, &headers)?;
    let report = query_handlers::get_playtime(
        application_id,
        state.repository.as_ref(),
        state.verifier.as_deref(),
        &state.lifecycle,
    )
    .await?;
    Ok(Json(report))
}

/// GET /submitter/{submitter_id}
#[instrument(skip(state))]
async fn get_submitter_status(
    State(state): State<AppState>,
    Path(submitter_id): Path<i64>,
) -> Result<Json<ApplicationView>, ApiError> {
    query_handlers::get_submitter_status(submitter_id, state.repository.as_ref(), &state.lifecycle)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("submitter {submitter_id} has no application")))
}

/// GET /?status=&limit=&offset=
#[instrument(skip(state, headers))]
async fn list_applications(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ApplicationView>>, ApiError> {
    authorized_actor(&state, &headers)?;
    let status = query
        .status
        .as_deref()
        .map(str::parse::<ApplicationStatus>)
        .transpose()?;

    let views = query_handlers::list_applications(
        status,
        query.limit,
        query.offset,
        state.repository.as_ref(),
        &state.lifecycle,
    )
    .await?;
    Ok(Json(views))
}

/// Returns the router for the application lifecycle.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(submit).get(list_applications))
        .route("/{application_id}", get(get_application))
        .route("/{application_id}/resubmit", post(resubmit))
        .route("/{application_id}/decision", post(decide))
        .route("/{application_id}/playtime", get(get_playtime))
        .route("/submitter/{submitter_id}", get(get_submitter_status))
}
