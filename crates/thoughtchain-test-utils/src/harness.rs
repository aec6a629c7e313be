// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end HTTP testing.
//!
//! `TestHarness` assembles the full stack (SQLite storage on a temp file, the
//! submission guard, the axum router) around a [`MutableClock`], and drives
//! requests through the router in-process with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use thoughtchain_config::model::StorageConfig;
use thoughtchain_core::{StorageAdapter, ThoughtError};
use thoughtchain_gateway::{GatewayState, build_router};
use thoughtchain_storage::SqliteStorage;

use crate::clock::MutableClock;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    now: DateTime<Utc>,
    maintenance_enabled: bool,
    prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            now: Utc::now(),
            maintenance_enabled: false,
            prometheus_render: None,
        }
    }

    /// Start the clock at `now`.
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Enable the maintenance clear endpoint.
    pub fn with_maintenance(mut self, enabled: bool) -> Self {
        self.maintenance_enabled = enabled;
        self
    }

    /// Serve `render()` output from `/metrics`.
    pub fn with_metrics(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }

    /// Build the test harness, creating the temp database and router.
    pub async fn build(self) -> Result<TestHarness, ThoughtError> {
        let temp_dir = tempfile::TempDir::new().map_err(ThoughtError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let storage = Arc::new(SqliteStorage::new(StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
            busy_timeout_ms: 5000,
        }));
        storage.initialize().await?;

        let clock = Arc::new(MutableClock::new(self.now));
        let state = GatewayState::new(
            storage.clone(),
            clock.clone(),
            self.maintenance_enabled,
            self.prometheus_render,
        );

        Ok(TestHarness {
            storage,
            clock,
            router: build_router(state),
            _temp_dir: temp_dir,
        })
    }
}

/// A status code and a parsed JSON body (`Value::Null` when empty).
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub text: String,
}

impl TestResponse {
    /// The `detail` field of an error body.
    pub fn detail(&self) -> Option<&str> {
        self.body.get("detail").and_then(Value::as_str)
    }
}

/// A complete test environment backed by a temp SQLite database.
pub struct TestHarness {
    /// SQLite storage adapter (temp DB, cleaned up on drop).
    pub storage: Arc<SqliteStorage>,
    /// The clock every request reads.
    pub clock: Arc<MutableClock>,
    pub router: Router,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Send one request through the router.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        headers: &[(&str, &str)],
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        };
        let request = match request {
            Ok(request) => request,
            Err(error) => panic!("invalid test request {uri}: {error}"),
        };

        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(infallible) => match infallible {},
        };
        let status = response.status();
        let bytes = match axum::body::to_bytes(response.into_body(), usize::MAX).await {
            Ok(bytes) => bytes,
            Err(error) => panic!("failed to read response body: {error}"),
        };
        let text = String::from_utf8_lossy(&bytes).to_string();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse { status, body, text }
    }

    /// POST /thoughts with the given fields.
    pub async fn create(&self, username: &str, thought_text: &str, token: &str) -> TestResponse {
        let body = serde_json::json!({
            "username": username,
            "thought_text": thought_text,
            "token": token,
        });
        self.send(Method::POST, "/thoughts", Some(body), &[]).await
    }

    /// GET /thoughts
    pub async fn list(&self) -> TestResponse {
        self.send(Method::GET, "/thoughts", None, &[]).await
    }
}
