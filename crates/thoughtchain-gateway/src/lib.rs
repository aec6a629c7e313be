// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP gateway for the Thoughtchain service.
//!
//! Exposes the thoughts API, the public health and metrics endpoints and the
//! development maintenance clear. Admission decisions are delegated to
//! [`thoughtchain_core::SubmissionGuard`]; this crate only maps them to HTTP.

pub mod error;
pub mod handlers;
pub mod openapi;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use openapi::ApiDoc;
pub use server::{
    GatewayState, HealthState, ServerConfig, build_router, serve_router, start_server,
};
