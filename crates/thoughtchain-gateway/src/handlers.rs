// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the thoughts API.

use std::time::Instant;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use thoughtchain_core::validation::validate_thought_text;
use thoughtchain_core::{
    ClearReport, CreatedThought, EditOutcome, EditSecret, HealthStatus, NewThought, Thought,
    ThoughtError, Verdict,
};

use crate::error::{ApiError, ErrorResponse};
use crate::server::GatewayState;

/// Header carrying the edit credential on PATCH and DELETE.
pub const EDIT_TOKEN_HEADER: &str = "x-edit-token";

/// Response body for GET /.
#[derive(Debug, Serialize, ToSchema)]
pub struct RootResponse {
    pub message: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok", "degraded" or "unhealthy", following the store's health check.
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub storage: String,
}

/// Request body for PATCH /thoughts/{id}.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateThought {
    /// 1 to 500 characters after trimming.
    #[serde(default)]
    pub thought_text: String,
}

/// Query parameters accepted by PATCH and DELETE.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EditTokenQuery {
    /// Edit token, used when the `X-Edit-Token` header is absent.
    pub token: Option<String>,
}

/// GET /
#[utoipa::path(
    get,
    path = "/",
    tag = "Health",
    summary = "Health Check",
    responses((status = 200, description = "Service is up.", body = RootResponse))
)]
pub async fn get_root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Healthy".to_string(),
    })
}

/// GET /health
///
/// Unauthenticated. A degraded store still answers 200; an unhealthy or
/// unreachable one answers 503.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    summary = "Service and storage health",
    responses(
        (status = 200, description = "Healthy or degraded.", body = HealthResponse),
        (status = 503, description = "Storage is unhealthy or unreachable.", body = HealthResponse),
    )
)]
pub async fn get_public_health(State(state): State<GatewayState>) -> Response {
    let (status, storage) = match state.store.health_check().await {
        Ok(HealthStatus::Healthy) => ("ok", "ok".to_string()),
        Ok(HealthStatus::Degraded(reason)) => ("degraded", format!("degraded: {reason}")),
        Ok(HealthStatus::Unhealthy(reason)) => ("unhealthy", format!("unhealthy: {reason}")),
        Err(e) => {
            tracing::warn!(error = %e, "storage health check failed");
            ("unhealthy", "unavailable".to_string())
        }
    };
    let code = if status == "unhealthy" {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    let body = HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.health.start_time.elapsed().as_secs(),
        storage,
    };
    (code, Json(body)).into_response()
}

/// GET /metrics
pub async fn get_public_metrics(State(state): State<GatewayState>) -> Response {
    match &state.health.prometheus_render {
        Some(render) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            render(),
        )
            .into_response(),
        None => (StatusCode::NOT_FOUND, "metrics disabled").into_response(),
    }
}

/// GET /thoughts
#[utoipa::path(
    get,
    path = "/thoughts",
    tag = "Thoughts",
    summary = "List all thoughts (oldest first)",
    description = "Fetch all thoughts ordered by creation time ascending (oldest first).",
    responses(
        (status = 200, description = "All thoughts, oldest first.", body = [Thought]),
        (status = 503, description = "Storage unavailable.", body = ErrorResponse),
    )
)]
pub async fn list_thoughts(
    State(state): State<GatewayState>,
) -> Result<Json<Vec<Thought>>, ApiError> {
    Ok(Json(state.store.list_thoughts().await?))
}

/// POST /thoughts
///
/// The clock is read once, after validation, and that reading decides the
/// UTC day the submission counts against.
#[utoipa::path(
    post,
    path = "/thoughts",
    tag = "Thoughts",
    summary = "Create a new thought (one per user per UTC day)",
    description = "Create a thought. Inputs are trimmed and validated. Each anonymous token may \
                   create one thought per UTC day. The response carries an edit_token that is \
                   required to edit or delete the thought.",
    request_body = NewThought,
    responses(
        (status = 201, description = "Thought created successfully.", body = CreatedThought),
        (status = 400, description = "Validation error.", body = ErrorResponse),
        (status = 409, description = "Duplicate submission for token in current UTC day.", body = ErrorResponse),
        (status = 503, description = "Storage unavailable.", body = ErrorResponse),
    )
)]
pub async fn create_thought(
    State(state): State<GatewayState>,
    payload: Result<Json<NewThought>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedThought>), ApiError> {
    let Json(body) = payload?;
    let (token, content) = body.validate()?;
    let now = state.clock.utc();

    let started = Instant::now();
    let verdict = state.guard.reserve(&token, now, content).await;
    thoughtchain_prometheus::record_reserve_latency(started.elapsed().as_secs_f64());

    let verdict = verdict?;
    thoughtchain_prometheus::record_reservation(verdict.label());
    match verdict {
        Verdict::Admitted(created) => Ok((StatusCode::CREATED, Json(created))),
        Verdict::Rejected { day } => Err(ThoughtError::GuardConflict { day }.into()),
    }
}

/// PATCH /thoughts/{id}
#[utoipa::path(
    patch,
    path = "/thoughts/{id}",
    tag = "Thoughts",
    summary = "Update a thought's text (token required)",
    description = "Replace the thought_text of a thought. Requires the edit token via the \
                   X-Edit-Token header or the token query parameter.",
    params(
        ("id" = i64, Path, description = "Thought id"),
        ("x-edit-token" = Option<String>, Header, description = "Edit token"),
        EditTokenQuery,
    ),
    request_body = UpdateThought,
    responses(
        (status = 200, description = "Thought updated successfully.", body = Thought),
        (status = 400, description = "Validation error.", body = ErrorResponse),
        (status = 403, description = "Invalid or missing edit token.", body = ErrorResponse),
        (status = 404, description = "Thought not found.", body = ErrorResponse),
    )
)]
pub async fn update_thought(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<EditTokenQuery>,
    headers: HeaderMap,
    payload: Result<Json<UpdateThought>, JsonRejection>,
) -> Result<Json<Thought>, ApiError> {
    let Path(id) = id?;
    let secret = presented_secret(&headers, &query)?;
    let Json(body) = payload?;
    let thought_text = validate_thought_text(&body.thought_text)?;

    let outcome = state
        .store
        .update_thought_text(id, &secret.digest(), &thought_text, state.clock.utc())
        .await?;
    match outcome {
        EditOutcome::Applied(thought) => Ok(Json(thought)),
        EditOutcome::NotFound => Err(ThoughtError::NotFound { id }.into()),
        EditOutcome::Forbidden => Err(ThoughtError::EditTokenInvalid.into()),
    }
}

/// DELETE /thoughts/{id}
///
/// Removes the thought only. The submitter's reservation for that day stays.
#[utoipa::path(
    delete,
    path = "/thoughts/{id}",
    tag = "Thoughts",
    summary = "Delete a thought (token required)",
    params(
        ("id" = i64, Path, description = "Thought id"),
        ("x-edit-token" = Option<String>, Header, description = "Edit token"),
        EditTokenQuery,
    ),
    responses(
        (status = 204, description = "Thought deleted."),
        (status = 403, description = "Invalid or missing edit token.", body = ErrorResponse),
        (status = 404, description = "Thought not found.", body = ErrorResponse),
    )
)]
pub async fn delete_thought(
    State(state): State<GatewayState>,
    id: Result<Path<i64>, PathRejection>,
    Query(query): Query<EditTokenQuery>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    let secret = presented_secret(&headers, &query)?;
    match state.store.delete_thought(id, &secret.digest()).await? {
        EditOutcome::Applied(()) => Ok(StatusCode::NO_CONTENT),
        EditOutcome::NotFound => Err(ThoughtError::NotFound { id }.into()),
        EditOutcome::Forbidden => Err(ThoughtError::EditTokenInvalid.into()),
    }
}

/// DELETE /admin/dev/clear-thoughts
#[utoipa::path(
    delete,
    path = "/admin/dev/clear-thoughts",
    tag = "Maintenance",
    summary = "Delete every thought and reservation",
    responses(
        (status = 200, description = "Everything removed.", body = ClearReport),
        (status = 403, description = "Maintenance endpoint is disabled.", body = ErrorResponse),
    )
)]
pub async fn clear_thoughts(
    State(state): State<GatewayState>,
) -> Result<Json<ClearReport>, ApiError> {
    if !state.maintenance_enabled {
        return Err(ApiError::MaintenanceDisabled);
    }
    let report = state.guard.clear().await?;
    thoughtchain_prometheus::record_clear();
    Ok(Json(report))
}

/// The edit credential from the header, falling back to the `token` query
/// parameter.
fn presented_secret(headers: &HeaderMap, query: &EditTokenQuery) -> Result<EditSecret, ApiError> {
    headers
        .get(EDIT_TOKEN_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(EditSecret::from_presented)
        .or_else(|| query.token.as_deref().and_then(EditSecret::from_presented))
        .ok_or(ApiError::Domain(ThoughtError::EditTokenMissing))
}
