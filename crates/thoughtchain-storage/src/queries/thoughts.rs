// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thought read, edit and delete operations. None of these touch guard records.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, TransactionBehavior, params};
use thoughtchain_core::types::format_timestamp;
use thoughtchain_core::{EditOutcome, Thought, ThoughtError};

use crate::database::{Database, map_tr_err};

/// All thoughts, oldest first.
pub async fn list_thoughts(db: &Database) -> Result<Vec<Thought>, ThoughtError> {
    db.connection()
        .call(|conn| -> Result<Vec<Thought>, rusqlite::Error> {
            let mut stmt = conn.prepare(
                "SELECT id, username, thought_text, created_at
                 FROM thoughts
                 ORDER BY created_at ASC, id ASC",
            )?;
            let rows = stmt.query_map([], row_to_thought)?;
            rows.collect()
        })
        .await
        .map_err(map_tr_err)
}

/// Replace the text of thought `id` when `edit_token_digest` matches.
pub async fn update_thought_text(
    db: &Database,
    id: i64,
    edit_token_digest: &str,
    thought_text: &str,
    now: DateTime<Utc>,
) -> Result<EditOutcome<Thought>, ThoughtError> {
    let digest = edit_token_digest.to_string();
    let thought_text = thought_text.to_string();
    let updated_at = format_timestamp(now);

    db.connection()
        .call(move |conn| -> Result<EditOutcome<Thought>, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            match stored_digest(&tx, id)? {
                None => return Ok(EditOutcome::NotFound),
                Some(stored) if stored != digest => return Ok(EditOutcome::Forbidden),
                Some(_) => {}
            }

            tx.execute(
                "UPDATE thoughts SET thought_text = ?1, updated_at = ?2 WHERE id = ?3",
                params![thought_text, updated_at, id],
            )?;
            let thought = tx.query_row(
                "SELECT id, username, thought_text, created_at FROM thoughts WHERE id = ?1",
                params![id],
                row_to_thought,
            )?;
            tx.commit()?;
            Ok(EditOutcome::Applied(thought))
        })
        .await
        .map_err(map_tr_err)
}

/// Delete thought `id` when `edit_token_digest` matches.
///
/// The guard record survives with a NULL `thought_id`, so the submitter's day
/// stays spent.
pub async fn delete_thought(
    db: &Database,
    id: i64,
    edit_token_digest: &str,
) -> Result<EditOutcome<()>, ThoughtError> {
    let digest = edit_token_digest.to_string();

    db.connection()
        .call(move |conn| -> Result<EditOutcome<()>, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            match stored_digest(&tx, id)? {
                None => return Ok(EditOutcome::NotFound),
                Some(stored) if stored != digest => return Ok(EditOutcome::Forbidden),
                Some(_) => {}
            }
            tx.execute("DELETE FROM thoughts WHERE id = ?1", params![id])?;
            tx.commit()?;
            Ok(EditOutcome::Applied(()))
        })
        .await
        .map_err(map_tr_err)
}

fn stored_digest(conn: &rusqlite::Connection, id: i64) -> Result<Option<String>, rusqlite::Error> {
    conn.query_row(
        "SELECT edit_token_hash FROM thoughts WHERE id = ?1",
        params![id],
        |row| row.get(0),
    )
    .optional()
}

fn row_to_thought(row: &rusqlite::Row<'_>) -> Result<Thought, rusqlite::Error> {
    Ok(Thought {
        id: row.get(0)?,
        username: row.get(1)?,
        thought_text: row.get(2)?,
        created_at: row.get(3)?,
    })
}
