// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thoughtchain clear` command implementation.
//!
//! Calls the maintenance endpoint of a running server. Exit codes:
//! 0 on success, 2 when the server answers with an error status,
//! 3 when the server cannot be reached.

use std::time::Duration;

/// Base URL used when neither `--base-url` nor `API_BASE` is given.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

const CLEAR_PATH: &str = "/admin/dev/clear-thoughts";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Request a full clear from the server at `base_url` and return the process exit code.
pub async fn run_clear(base_url: &str) -> i32 {
    let url = format!("{}{CLEAR_PATH}", base_url.trim_end_matches('/'));

    let client = match reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Request failed: {e}");
            return 3;
        }
    };

    let response = match client.delete(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Request failed: {e}");
            return 3;
        }
    };

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    if !status.is_success() {
        eprintln!("HTTP error: {} {body}", status.as_u16());
        return 2;
    }

    let rendered = serde_json::from_str::<serde_json::Value>(&body)
        .ok()
        .and_then(|json| serde_json::to_string_pretty(&json).ok())
        .unwrap_or(body);
    println!("Success:");
    println!("{rendered}");
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use thoughtchain_gateway::serve_router;
    use thoughtchain_test_utils::TestHarness;
    use tokio_util::sync::CancellationToken;

    async fn spawn_server(harness: &TestHarness) -> (String, CancellationToken) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let cancel = CancellationToken::new();
        let router = harness.router.clone();
        let token = cancel.clone();
        tokio::spawn(async move {
            serve_router(listener, router, token).await.unwrap();
        });
        (format!("http://{addr}"), cancel)
    }

    #[tokio::test]
    async fn clear_succeeds_when_maintenance_enabled() {
        let harness = TestHarness::builder()
            .with_maintenance(true)
            .build()
            .await
            .unwrap();
        assert_eq!(
            harness.create("ada", "first", "token-aaaa").await.status.as_u16(),
            201
        );

        let (base, cancel) = spawn_server(&harness).await;
        assert_eq!(run_clear(&format!("{base}/")).await, 0);
        cancel.cancel();

        assert_eq!(harness.list().await.body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn clear_reports_http_error_when_maintenance_disabled() {
        let harness = TestHarness::builder().build().await.unwrap();
        harness.create("ada", "kept", "token-aaaa").await;

        let (base, cancel) = spawn_server(&harness).await;
        assert_eq!(run_clear(&base).await, 2);
        cancel.cancel();

        assert_eq!(harness.list().await.body.as_array().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn clear_reports_transport_error_when_unreachable() {
        // Bind then drop to find a port with nothing listening.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        assert_eq!(run_clear(&format!("http://{addr}")).await, 3);
    }
}
