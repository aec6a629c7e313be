// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thoughtchain serve` command implementation.
//!
//! Wires storage, the optional Prometheus recorder and the HTTP gateway
//! together, then serves until a shutdown signal arrives.

use std::sync::Arc;

use thoughtchain_config::ThoughtchainConfig;
use thoughtchain_core::{StorageAdapter, ThoughtError};
use thoughtchain_gateway::{GatewayState, ServerConfig, start_server};
use thoughtchain_prometheus::PrometheusAdapter;
use thoughtchain_storage::SqliteStorage;
use tracing::{info, warn};

use crate::shutdown;

/// Run the serve command.
pub async fn run_serve(config: ThoughtchainConfig) -> Result<(), ThoughtError> {
    init_tracing(&config.server.log_level);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "thoughtchain starting"
    );

    let storage = Arc::new(SqliteStorage::new(config.storage.clone()));
    storage.initialize().await?;
    info!(path = %config.storage.database_path, "storage initialized");

    let prometheus_render = if config.metrics.enabled {
        let adapter = PrometheusAdapter::new()?;
        info!("prometheus metrics enabled");
        let render: Arc<dyn Fn() -> String + Send + Sync> = Arc::new(move || adapter.render());
        Some(render)
    } else {
        None
    };

    if config.maintenance.enabled {
        warn!("maintenance endpoint enabled: DELETE /admin/dev/clear-thoughts wipes all data");
    }

    let state = GatewayState::new(
        storage.clone(),
        Arc::new(mockable::DefaultClock),
        config.maintenance.enabled,
        prometheus_render,
    );

    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let cancel = shutdown::install_signal_handler();
    let served = start_server(&server_config, state, cancel).await;

    if let Err(e) = storage.close().await {
        warn!(error = %e, "failed to close storage cleanly");
    }
    info!("thoughtchain stopped");

    served
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "thoughtchain={log_level},thoughtchain_gateway={log_level},thoughtchain_storage={log_level},tower_http={log_level},warn"
        ))
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .try_init();
}
