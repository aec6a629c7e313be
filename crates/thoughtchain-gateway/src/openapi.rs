// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! OpenAPI document served at `/openapi.json`, generated from the handler
//! annotations.

use axum::Json;
use utoipa::OpenApi;

use thoughtchain_core::{ClearReport, CreatedThought, NewThought, Thought};

use crate::error::ErrorResponse;
use crate::handlers::{self, HealthResponse, RootResponse, UpdateThought};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Daily Thought Chain API",
        version = "1.2.0",
        description = "API for submitting and retrieving daily thoughts. \
                       Each anonymous token can submit a single thought per UTC day. \
                       Thoughts are returned in chronological order."
    ),
    tags(
        (name = "Health", description = "Service status and health checks."),
        (name = "Thoughts", description = "Submit and fetch daily thoughts. One per token per UTC day."),
        (name = "Maintenance", description = "Development-only reset. Disabled unless maintenance mode is on."),
    ),
    paths(
        handlers::get_root,
        handlers::get_public_health,
        handlers::list_thoughts,
        handlers::create_thought,
        handlers::update_thought,
        handlers::delete_thought,
        handlers::clear_thoughts,
    ),
    components(schemas(
        Thought,
        CreatedThought,
        NewThought,
        UpdateThought,
        ClearReport,
        ErrorResponse,
        RootResponse,
        HealthResponse,
    ))
)]
pub struct ApiDoc;

/// GET /openapi.json
pub async fn get_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
