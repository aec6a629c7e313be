// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `thoughtchain migrate` command implementation.

use thoughtchain_config::ThoughtchainConfig;
use thoughtchain_core::ThoughtError;
use thoughtchain_storage::{Database, DatabaseOptions};

/// Open the configured database, which applies any pending migrations, then close it.
pub async fn run_migrate(config: &ThoughtchainConfig) -> Result<(), ThoughtError> {
    let path = &config.storage.database_path;
    let db = Database::open_with(path, DatabaseOptions::from(&config.storage)).await?;
    db.close().await?;
    eprintln!("thoughtchain: database at {path} is up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn migrate_creates_a_fresh_database() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("fresh.db");
        let mut config = ThoughtchainConfig::default();
        config.storage.database_path = db_path.to_string_lossy().to_string();

        run_migrate(&config).await.unwrap();
        assert!(db_path.exists());
        run_migrate(&config).await.unwrap();
    }
}
