//! Handlers for the `/watches` resource.
//!
//! Every handler follows the same chain: parse, validate and canonicalize,
//! call the service, map the outcome. Unexpected storage failures are written
//! to the diagnostics sink together with the request payload; the caller only
//! sees a generic, operation-specific message.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use watches_core::error::CoreError;
use watches_core::validation::{
    validate_create, validate_update, CreateWatchInput, UpdateWatchInput,
};

use crate::diagnostics::DiagnosticReport;
use crate::error::{AppError, AppResult};
use crate::extract::IdParam;
use crate::query::PageParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

const CREATE_FAILED: &str =
    "Something went wrong on our side while trying to create the resource.";
const FIND_FAILED: &str = "Something went wrong on our side while trying to find the resource.";
const UPDATE_FAILED: &str =
    "Something went wrong on our side while trying to update the resource.";
const DELETE_FAILED: &str =
    "Something went wrong on our side while trying to delete the resource.";

/// Report a storage failure and replace it with `public_message`.
///
/// Any other error passes through unchanged.
fn conceal(err: CoreError, report: DiagnosticReport, public_message: &'static str) -> AppError {
    match err {
        CoreError::Storage(source) => {
            if let Err(e) = report.error(&source).emit() {
                tracing::warn!(error = %e, "Could not emit diagnostic report");
            }
            AppError::Internal(public_message)
        }
        other => AppError::Core(other),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/watches
///
/// Validate, reject duplicates, then insert.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<CreateWatchInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let candidate = validate_create(&input)?;
    let report = || {
        DiagnosticReport::new()
            .context("create route handler")
            .payload(&input)
    };

    let key = candidate.key();
    if state
        .watches
        .exists(&key)
        .await
        .map_err(|e| conceal(e, report(), CREATE_FAILED))?
    {
        return Err(CoreError::Conflict(key).into());
    }

    let watch = state
        .watches
        .create(&candidate)
        .await
        .map_err(|e| conceal(e, report(), CREATE_FAILED))?;

    tracing::info!(id = watch.id, key = %watch.key(), "Watch created");
    Ok((StatusCode::CREATED, Json(DataResponse { data: watch })))
}

/// GET /api/v1/watches?page=1&limit=25
///
/// One page of watches with the page count.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<impl IntoResponse> {
    let pagination = params.pagination(state.config.max_page_limit);
    let page = state.watches.list_page(pagination).await.map_err(|e| {
        let report = DiagnosticReport::new().context(format!(
            "find_all route handler with page {} and limit {}",
            pagination.page, pagination.limit
        ));
        conceal(e, report, FIND_FAILED)
    })?;
    Ok(Json(DataResponse { data: page }))
}

/// GET /api/v1/watches/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<impl IntoResponse> {
    let watch = state.watches.find_one(id).await.map_err(|e| {
        let report =
            DiagnosticReport::new().context(format!("find_one route handler with id {id}"));
        conceal(e, report, FIND_FAILED)
    })?;
    Ok(Json(DataResponse { data: watch }))
}

/// PATCH /api/v1/watches/{id}
///
/// Partial update. An empty body is rejected before the id is looked up.
pub async fn update(
    State(state): State<AppState>,
    IdParam(id): IdParam,
    payload: Result<Json<UpdateWatchInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let changes = validate_update(&input)?;
    let report = || {
        DiagnosticReport::new()
            .context(format!("update route handler with id {id}"))
            .payload(&input)
    };

    let watch = state
        .watches
        .update(id, &changes)
        .await
        .map_err(|e| conceal(e, report(), UPDATE_FAILED))?;

    tracing::info!(id, "Watch updated");
    Ok(Json(DataResponse { data: watch }))
}

/// DELETE /api/v1/watches/{id}
pub async fn delete(
    State(state): State<AppState>,
    IdParam(id): IdParam,
) -> AppResult<impl IntoResponse> {
    state.watches.remove(id).await.map_err(|e| {
        let report =
            DiagnosticReport::new().context(format!("remove route handler with id {id}"));
        conceal(e, report, DELETE_FAILED)
    })?;

    tracing::info!(id, "Watch deleted");
    Ok(Json(MessageResponse {
        message: "Watch has been deleted successfully.",
    }))
}
