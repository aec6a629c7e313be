// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A failed thought insert must not leave a guard record behind.

use chrono::{DateTime, Utc};
use tempfile::tempdir;
use thoughtchain_core::{GuardKey, Reservation, SubmitterToken, ThoughtDraft, ThoughtError};
use thoughtchain_storage::Database;
use thoughtchain_storage::queries::{guard, thoughts};

fn draft(now: DateTime<Utc>) -> ThoughtDraft {
    ThoughtDraft {
        username: "linus".to_string(),
        thought_text: "will this stick?".to_string(),
        edit_token_digest: "digest".to_string(),
        created_at: now,
    }
}

async fn set_insert_fault(db: &Database, enabled: bool) {
    let sql = if enabled {
        "CREATE TRIGGER fail_thought_insert BEFORE INSERT ON thoughts \
         BEGIN SELECT RAISE(ABORT, 'simulated thought persistence failure'); END;"
    } else {
        "DROP TRIGGER fail_thought_insert;"
    };
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute_batch(sql)?;
            Ok(())
        })
        .await
        .unwrap();
}

#[tokio::test]
async fn thought_insert_failure_rolls_back_the_reservation() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("fault.db");
    let db = Database::open(db_path.to_str().unwrap()).await.unwrap();
    let token = SubmitterToken::parse("a1b2c3d4e5f6g7h8").unwrap();
    let now = DateTime::parse_from_rfc3339("2025-11-28T12:00:00Z")
        .unwrap()
        .with_timezone(&Utc);
    let key = GuardKey::derive(&token, now);

    set_insert_fault(&db, true).await;
    let err = guard::reserve(&db, &key, &draft(now)).await.unwrap_err();
    assert!(matches!(err, ThoughtError::Storage { .. }), "got {err:?}");
    assert!(err.is_retryable());
    assert_eq!(guard::count_reservations(&db).await.unwrap(), 0);
    assert!(thoughts::list_thoughts(&db).await.unwrap().is_empty());

    set_insert_fault(&db, false).await;
    let retry = guard::reserve(&db, &key, &draft(now)).await.unwrap();
    assert!(matches!(retry, Reservation::Committed(_)));
    assert_eq!(guard::count_reservations(&db).await.unwrap(), 1);
}
