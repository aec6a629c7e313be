// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::OnceCell;
use tracing::debug;

use thoughtchain_config::model::StorageConfig;
use thoughtchain_core::{
    ClearReport, EditOutcome, GuardKey, HealthStatus, PluginAdapter, Reservation, StorageAdapter,
    Thought, ThoughtDraft, ThoughtError,
};

use crate::database::{Database, DatabaseOptions, map_tr_err};
use crate::queries;

/// SQLite-backed storage adapter.
///
/// Wraps a [`Database`] handle and delegates to the query modules. The
/// database is opened on the first call to [`StorageAdapter::initialize`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until `initialize` is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns the underlying Database, or an error if not initialized.
    pub fn db(&self) -> Result<&Database, ThoughtError> {
        self.db.get().ok_or_else(|| {
            ThoughtError::storage("storage not initialized -- call initialize() first")
        })
    }

    async fn checkpoint(db: &Database) -> Result<(), ThoughtError> {
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

/// Map SQLite's own diagnostics to a health status.
///
/// A failed integrity check is unhealthy. Running without WAL when WAL was
/// configured still serves requests, but writers block readers.
fn classify_health(integrity: &str, journal_mode: &str, wal_expected: bool) -> HealthStatus {
    if !integrity.eq_ignore_ascii_case("ok") {
        return HealthStatus::Unhealthy(format!("integrity check failed: {integrity}"));
    }
    if wal_expected && !journal_mode.eq_ignore_ascii_case("wal") {
        return HealthStatus::Degraded(format!("journal mode is {journal_mode}, expected wal"));
    }
    HealthStatus::Healthy
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ThoughtError> {
        let db = self.db()?;
        let (integrity, journal_mode) = db
            .connection()
            .call(|conn| -> Result<(String, String), rusqlite::Error> {
                let integrity = conn.query_row("PRAGMA quick_check(1)", [], |row| row.get(0))?;
                let journal_mode = conn.query_row("PRAGMA journal_mode", [], |row| row.get(0))?;
                Ok((integrity, journal_mode))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(classify_health(
            &integrity,
            &journal_mode,
            self.config.wal_mode,
        ))
    }

    async fn shutdown(&self) -> Result<(), ThoughtError> {
        if let Some(db) = self.db.get() {
            Self::checkpoint(db).await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), ThoughtError> {
        let options = DatabaseOptions::from(&self.config);
        let db = Database::open_with(&self.config.database_path, options).await?;
        self.db
            .set(db)
            .map_err(|_| ThoughtError::storage("storage already initialized"))?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), ThoughtError> {
        Self::checkpoint(self.db()?).await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn reserve(
        &self,
        key: &GuardKey,
        draft: &ThoughtDraft,
    ) -> Result<Reservation, ThoughtError> {
        queries::guard::reserve(self.db()?, key, draft).await
    }

    async fn clear_all(&self) -> Result<ClearReport, ThoughtError> {
        queries::guard::clear_all(self.db()?).await
    }

    async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtError> {
        queries::thoughts::list_thoughts(self.db()?).await
    }

    async fn update_thought_text(
        &self,
        id: i64,
        edit_token_digest: &str,
        thought_text: &str,
        now: DateTime<Utc>,
    ) -> Result<EditOutcome<Thought>, ThoughtError> {
        queries::thoughts::update_thought_text(self.db()?, id, edit_token_digest, thought_text, now)
            .await
    }

    async fn delete_thought(
        &self,
        id: i64,
        edit_token_digest: &str,
    ) -> Result<EditOutcome<()>, ThoughtError> {
        queries::thoughts::delete_thought(self.db()?, id, edit_token_digest).await
    }
}
