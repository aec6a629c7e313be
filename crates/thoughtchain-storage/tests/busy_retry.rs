// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reserve waits out a competing writer for at most two busy timeouts.

use std::path::{Path, PathBuf};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tempfile::tempdir;
use thoughtchain_core::{GuardKey, Reservation, SubmitterToken, ThoughtDraft, ThoughtError};
use thoughtchain_storage::queries::guard;
use thoughtchain_storage::{Database, DatabaseOptions};

const BUSY_TIMEOUT: Duration = Duration::from_millis(100);

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-11-28T09:30:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn draft() -> ThoughtDraft {
    ThoughtDraft {
        username: "grace".to_string(),
        thought_text: "waiting my turn".to_string(),
        edit_token_digest: "digest".to_string(),
        created_at: now(),
    }
}

async fn open(path: &Path) -> Database {
    Database::open_with(
        path.to_str().unwrap(),
        DatabaseOptions {
            wal_mode: true,
            busy_timeout: BUSY_TIMEOUT,
        },
    )
    .await
    .unwrap()
}

/// Take the write lock from a separate connection and hold it for `hold`.
/// Returns once the lock is held.
async fn hold_write_lock(path: PathBuf, hold: Duration) -> JoinHandle<()> {
    let (locked_tx, locked_rx) = tokio::sync::oneshot::channel();
    let holder = std::thread::spawn(move || {
        let conn = rusqlite::Connection::open(&path).unwrap();
        conn.execute_batch("BEGIN IMMEDIATE;").unwrap();
        locked_tx.send(()).unwrap();
        std::thread::sleep(hold);
        conn.execute_batch("COMMIT;").unwrap();
    });
    locked_rx.await.unwrap();
    holder
}

#[tokio::test(flavor = "multi_thread")]
async fn lock_released_within_the_retry_window_commits() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("busy.db");
    let db = open(&db_path).await;
    let key = GuardKey::derive(&SubmitterToken::parse("patient-token").unwrap(), now());

    // Longer than one busy timeout, shorter than two.
    let holder = hold_write_lock(db_path.clone(), Duration::from_millis(150)).await;
    let outcome = guard::reserve(&db, &key, &draft()).await.unwrap();
    holder.join().unwrap();

    assert!(matches!(outcome, Reservation::Committed(_)), "got {outcome:?}");
    assert_eq!(guard::count_reservations(&db).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread")]
async fn lock_held_past_the_retry_window_is_a_storage_error() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("busy.db");
    let db = open(&db_path).await;
    let key = GuardKey::derive(&SubmitterToken::parse("impatient-token").unwrap(), now());

    let holder = hold_write_lock(db_path.clone(), Duration::from_millis(800)).await;
    let err = guard::reserve(&db, &key, &draft()).await.unwrap_err();
    holder.join().unwrap();

    assert!(matches!(err, ThoughtError::Storage { .. }), "got {err:?}");
    assert!(err.is_retryable());
    assert_eq!(guard::count_reservations(&db).await.unwrap(), 0);

    // Nothing was half-written, so the same key is still free.
    let retried = guard::reserve(&db, &key, &draft()).await.unwrap();
    assert!(matches!(retried, Reservation::Committed(_)));
}
