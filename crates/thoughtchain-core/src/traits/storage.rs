// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage adapter trait for persistence backends (SQLite, etc.).

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::day_key::GuardKey;
use crate::error::ThoughtError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ClearReport, EditOutcome, Reservation, Thought, ThoughtDraft};

/// Adapter for the durable store holding thoughts and guard records.
///
/// Implementations must enforce uniqueness of the guard key inside the
/// store itself and commit a reservation together with its thought as one
/// atomic unit.
#[async_trait]
pub trait StorageAdapter: PluginAdapter {
    /// Initializes the storage backend (migrations, connection, pragmas).
    async fn initialize(&self) -> Result<(), ThoughtError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), ThoughtError>;

    /// Insert the guard record for `key` and the thought in one transaction.
    ///
    /// A uniqueness conflict on the guard record yields
    /// [`Reservation::Conflict`]; any other failure rolls back both writes
    /// and is returned as an error.
    async fn reserve(
        &self,
        key: &GuardKey,
        draft: &ThoughtDraft,
    ) -> Result<Reservation, ThoughtError>;

    /// Remove every guard record and every thought under one write lock.
    async fn clear_all(&self) -> Result<ClearReport, ThoughtError>;

    /// All thoughts, oldest first.
    async fn list_thoughts(&self) -> Result<Vec<Thought>, ThoughtError>;

    /// Replace a thought's text if `edit_token_digest` matches.
    async fn update_thought_text(
        &self,
        id: i64,
        edit_token_digest: &str,
        thought_text: &str,
        now: DateTime<Utc>,
    ) -> Result<EditOutcome<Thought>, ThoughtError>;

    /// Delete a thought if `edit_token_digest` matches. Guard records are kept.
    async fn delete_thought(
        &self,
        id: i64,
        edit_token_digest: &str,
    ) -> Result<EditOutcome<()>, ThoughtError>;
}
