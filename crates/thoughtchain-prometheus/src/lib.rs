// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus metrics adapter for the Thoughtchain service.
//!
//! Uses the metrics-rs facade with the Prometheus exporter.
//! Metrics are rendered as Prometheus text format via the `render()` method,
//! which is exposed through the gateway's /metrics endpoint.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use thoughtchain_core::{HealthStatus, PluginAdapter, ThoughtError};

pub use recording::{
    record_clear, record_reservation, record_reserve_latency, record_storage_error,
};

/// Prometheus metrics adapter.
///
/// Installs the Prometheus recorder and exposes a handle for rendering
/// metrics in Prometheus text format.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Create a new PrometheusAdapter.
    ///
    /// Installs the Prometheus recorder globally. Only one recorder can be
    /// installed per process. Returns an error if a recorder is already installed.
    pub fn new() -> Result<Self, ThoughtError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            ThoughtError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;

        recording::register_metrics();

        tracing::info!("prometheus metrics recorder installed");

        Ok(Self { handle })
    }

    /// Get a reference to the Prometheus handle for rendering.
    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    /// Render all collected metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ThoughtError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ThoughtError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A local recorder keeps these tests independent of the global one.
    fn render_with<F: FnOnce()>(record: F) -> String {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            recording::register_metrics();
            record();
        });
        handle.render()
    }

    #[test]
    fn reservations_are_labelled_by_verdict() {
        let output = render_with(|| {
            record_reservation("admitted");
            record_reservation("rejected");
            record_reservation("rejected");
        });
        assert!(output.contains(r#"thoughtchain_reservations_total{verdict="admitted"} 1"#));
        assert!(output.contains(r#"thoughtchain_reservations_total{verdict="rejected"} 2"#));
    }

    #[test]
    fn storage_errors_and_clears_are_counted() {
        let output = render_with(|| {
            record_storage_error();
            record_clear();
            record_clear();
        });
        assert!(output.contains("thoughtchain_storage_errors_total 1"));
        assert!(output.contains("thoughtchain_clears_total 2"));
    }

    #[test]
    fn reserve_latency_is_exported() {
        let output = render_with(|| record_reserve_latency(0.002));
        assert!(output.contains("thoughtchain_reserve_latency_seconds"));
    }
}
