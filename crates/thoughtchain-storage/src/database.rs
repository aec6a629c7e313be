// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All statements issued through a [`Database`] run on tokio-rusqlite's single
//! background thread. Separate handles (or processes) on the same file
//! serialize through SQLite's write lock and the configured busy timeout.

use std::path::Path;
use std::time::Duration;

use thoughtchain_config::model::StorageConfig;
use thoughtchain_core::ThoughtError;
use tracing::debug;

use crate::migrations;

/// Connection settings applied to every connection opened for a [`Database`].
#[derive(Debug, Clone, Copy)]
pub struct DatabaseOptions {
    pub wal_mode: bool,
    pub busy_timeout: Duration,
}

impl Default for DatabaseOptions {
    fn default() -> Self {
        Self {
            wal_mode: true,
            busy_timeout: Duration::from_millis(5000),
        }
    }
}

impl From<&StorageConfig> for DatabaseOptions {
    fn from(config: &StorageConfig) -> Self {
        Self {
            wal_mode: config.wal_mode,
            busy_timeout: Duration::from_millis(config.busy_timeout_ms),
        }
    }
}

/// Handle to an open, migrated SQLite database.
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path` with default options.
    pub async fn open(path: &str) -> Result<Self, ThoughtError> {
        Self::open_with(path, DatabaseOptions::default()).await
    }

    /// Open the database at `path`, apply pragmas and run pending migrations.
    pub async fn open_with(path: &str, options: DatabaseOptions) -> Result<Self, ThoughtError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(ThoughtError::storage)?;
            }
        }

        // Migrations need `&mut Connection` and their own error type, so they
        // run on a short-lived blocking connection before the async one opens.
        let migrate_path = path.to_string();
        tokio::task::spawn_blocking(move || -> Result<(), ThoughtError> {
            let mut conn =
                rusqlite::Connection::open(&migrate_path).map_err(ThoughtError::storage)?;
            apply_pragmas(&conn, &options).map_err(ThoughtError::storage)?;
            migrations::run_migrations(&mut conn)
        })
        .await
        .map_err(|e| ThoughtError::Internal(format!("migration task failed: {e}")))??;

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(ThoughtError::storage)?;
        conn.call(move |conn| apply_pragmas(conn, &options))
            .await
            .map_err(map_tr_err)?;

        debug!(path, wal = options.wal_mode, "database opened");
        Ok(Self { conn })
    }

    /// The async connection all queries go through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL and close the background connection.
    pub async fn close(self) -> Result<(), ThoughtError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        self.conn.close().await.map_err(ThoughtError::storage)
    }
}

fn apply_pragmas(
    conn: &rusqlite::Connection,
    options: &DatabaseOptions,
) -> Result<(), rusqlite::Error> {
    conn.busy_timeout(options.busy_timeout)?;
    if options.wal_mode {
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
    }
    conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON;")?;
    Ok(())
}

/// Convert a tokio-rusqlite call failure into a storage error.
pub(crate) fn map_tr_err(e: tokio_rusqlite::Error<rusqlite::Error>) -> ThoughtError {
    ThoughtError::storage(e)
}
