// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Guard record operations: the atomic reserve-and-insert and the total clear.

use rusqlite::{ErrorCode, TransactionBehavior, params};
use thoughtchain_core::types::format_timestamp;
use thoughtchain_core::{ClearReport, GuardKey, Reservation, Thought, ThoughtDraft, ThoughtError};
use tracing::{debug, warn};

use crate::database::{Database, map_tr_err};

/// Insert the guard record for `key` and the thought from `draft` as one
/// immediate transaction.
///
/// A UNIQUE or PRIMARY KEY violation on the guard insert is the only conflict
/// signal. Every other failure drops the transaction, rolling back both rows.
/// A busy or locked database gets exactly one more attempt.
pub async fn reserve(
    db: &Database,
    key: &GuardKey,
    draft: &ThoughtDraft,
) -> Result<Reservation, ThoughtError> {
    let token = key.token().as_str().to_string();
    let day_key = key.day_key();
    let draft = draft.clone();

    db.connection()
        .call(move |conn| match try_reserve(conn, &token, &day_key, &draft) {
            Err(e) if is_busy(&e) => {
                warn!(day_key = %day_key, "database busy during reserve, retrying once");
                try_reserve(conn, &token, &day_key, &draft)
            }
            other => other,
        })
        .await
        .map_err(map_tr_err)
}

fn try_reserve(
    conn: &mut rusqlite::Connection,
    token: &str,
    day_key: &str,
    draft: &ThoughtDraft,
) -> Result<Reservation, rusqlite::Error> {
    let created_at = format_timestamp(draft.created_at);
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    match tx.execute(
        "INSERT INTO thought_token_guard (token, day_key, reserved_at) VALUES (?1, ?2, ?3)",
        params![token, day_key, created_at],
    ) {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            debug!(day_key, "guard key already reserved");
            return Ok(Reservation::Conflict);
        }
        Err(e) => return Err(e),
    }
    let guard_id = tx.last_insert_rowid();

    tx.execute(
        "INSERT INTO thoughts (username, thought_text, edit_token_hash, created_at) \
         VALUES (?1, ?2, ?3, ?4)",
        params![
            draft.username,
            draft.thought_text,
            draft.edit_token_digest,
            created_at
        ],
    )?;
    let thought_id = tx.last_insert_rowid();

    tx.execute(
        "UPDATE thought_token_guard SET thought_id = ?1 WHERE id = ?2",
        params![thought_id, guard_id],
    )?;
    tx.commit()?;

    Ok(Reservation::Committed(Thought {
        id: thought_id,
        username: draft.username.clone(),
        thought_text: draft.thought_text.clone(),
        created_at,
    }))
}

/// Delete every guard record and every thought under one write lock.
pub async fn clear_all(db: &Database) -> Result<ClearReport, ThoughtError> {
    db.connection()
        .call(|conn| -> Result<ClearReport, rusqlite::Error> {
            let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
            let reservations_removed = tx.execute("DELETE FROM thought_token_guard", [])?;
            let thoughts_removed = tx.execute("DELETE FROM thoughts", [])?;
            tx.commit()?;
            Ok(ClearReport {
                thoughts_removed: thoughts_removed as u64,
                reservations_removed: reservations_removed as u64,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Number of guard records currently held.
pub async fn count_reservations(db: &Database) -> Result<i64, ThoughtError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM thought_token_guard", [], |row| {
                row.get(0)
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Whether `err` is a uniqueness violation, as opposed to any other
/// constraint failure such as a trigger abort or NOT NULL.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(e, _) => {
            e.code == ErrorCode::ConstraintViolation
                && (e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

fn is_busy(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == ErrorCode::DatabaseBusy || e.code == ErrorCode::DatabaseLocked
    )
}
