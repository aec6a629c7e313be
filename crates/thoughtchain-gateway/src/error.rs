// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP error mapping. Every error body is `{"detail": "<message>"}`.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use thoughtchain_core::ThoughtError;

/// Detail returned for storage failures. Callers may retry.
pub const STORAGE_UNAVAILABLE: &str = "Storage is temporarily unavailable. Please try again.";

/// Errors produced by gateway handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A domain error from the guard, validation or storage layers.
    #[error(transparent)]
    Domain(#[from] ThoughtError),

    /// The maintenance endpoint was called while maintenance is disabled.
    #[error("Maintenance endpoint is disabled.")]
    MaintenanceDisabled,

    /// The request body was not valid JSON for the endpoint.
    #[error("{0}")]
    MalformedBody(String),

    /// A path parameter could not be parsed, such as a non-numeric id.
    #[error("{0}")]
    MalformedPath(String),
}

/// Error response body.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedPath(rejection.body_text())
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Domain(err) => match err {
                ThoughtError::Validation { .. } => StatusCode::BAD_REQUEST,
                ThoughtError::GuardConflict { .. } => StatusCode::CONFLICT,
                ThoughtError::Storage { .. } => StatusCode::SERVICE_UNAVAILABLE,
                ThoughtError::NotFound { .. } => StatusCode::NOT_FOUND,
                ThoughtError::EditTokenMissing | ThoughtError::EditTokenInvalid => {
                    StatusCode::FORBIDDEN
                }
                ThoughtError::Config(_) | ThoughtError::Internal(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            ApiError::MaintenanceDisabled => StatusCode::FORBIDDEN,
            ApiError::MalformedBody(_) | ApiError::MalformedPath(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// A user-safe message that never leaks storage internals.
    pub fn detail(&self) -> String {
        match self {
            ApiError::Domain(ThoughtError::Storage { .. }) => STORAGE_UNAVAILABLE.to_string(),
            ApiError::Domain(ThoughtError::Config(_) | ThoughtError::Internal(_)) => {
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Domain(err) if err.is_expected() => {
                tracing::debug!(error = %self, "request refused");
            }
            ApiError::Domain(ThoughtError::Storage { .. }) => {
                thoughtchain_prometheus::record_storage_error();
                tracing::error!(error = %self, "storage failure while serving request");
            }
            ApiError::Domain(_) => {
                tracing::error!(error = %self, "internal error while serving request");
            }
            ApiError::MaintenanceDisabled => {
                tracing::info!("maintenance endpoint called while disabled");
            }
            ApiError::MalformedBody(_) | ApiError::MalformedPath(_) => {
                tracing::debug!(error = %self, "malformed request");
            }
        }

        let status = self.status_code();
        (status, Json(ErrorResponse { detail: self.detail() })).into_response()
    }
}
