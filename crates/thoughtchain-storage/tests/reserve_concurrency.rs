// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Concurrent reservations for one key admit exactly one writer.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tempfile::tempdir;
use thoughtchain_core::{GuardKey, Reservation, SubmitterToken, ThoughtDraft};
use thoughtchain_storage::Database;
use thoughtchain_storage::queries::guard;

const CONTENDERS: usize = 16;

fn now() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2025-11-28T23:59:59Z")
        .unwrap()
        .with_timezone(&Utc)
}

fn draft(i: usize) -> ThoughtDraft {
    ThoughtDraft {
        username: format!("racer-{i}"),
        thought_text: format!("attempt {i}"),
        edit_token_digest: format!("digest-{i}"),
        created_at: now(),
    }
}

fn count_committed(results: &[Reservation]) -> usize {
    results
        .iter()
        .filter(|r| matches!(r, Reservation::Committed(_)))
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn tasks_sharing_one_database_admit_exactly_one() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("shared.db");
    let db = Arc::new(Database::open(db_path.to_str().unwrap()).await.unwrap());
    let token = SubmitterToken::parse("a1b2c3d4e5f6g7h8").unwrap();

    let mut handles = Vec::new();
    for i in 0..CONTENDERS {
        let db = Arc::clone(&db);
        let key = GuardKey::derive(&token, now());
        handles.push(tokio::spawn(async move {
            guard::reserve(&db, &key, &draft(i)).await.unwrap()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(count_committed(&results), 1);
    assert_eq!(guard::count_reservations(&db).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn independent_handles_on_one_file_admit_exactly_one() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("multi-handle.db");
    let path = db_path.to_str().unwrap();
    let first = Arc::new(Database::open(path).await.unwrap());
    let second = Arc::new(Database::open(path).await.unwrap());
    let token = SubmitterToken::parse("a1b2c3d4e5f6g7h8").unwrap();

    let mut handles = Vec::new();
    for i in 0..CONTENDERS {
        let db = if i % 2 == 0 {
            Arc::clone(&first)
        } else {
            Arc::clone(&second)
        };
        let key = GuardKey::derive(&token, now());
        handles.push(tokio::spawn(async move {
            guard::reserve(&db, &key, &draft(i)).await.unwrap()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(count_committed(&results), 1);
    assert_eq!(guard::count_reservations(&first).await.unwrap(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn distinct_tokens_do_not_contend() {
    let dir = tempdir().unwrap();
    let db_path = dir.path().join("distinct.db");
    let db = Arc::new(Database::open(db_path.to_str().unwrap()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..CONTENDERS {
        let db = Arc::clone(&db);
        let token = SubmitterToken::parse(&format!("submitter-{i:04}")).unwrap();
        let key = GuardKey::derive(&token, now());
        handles.push(tokio::spawn(async move {
            guard::reserve(&db, &key, &draft(i)).await.unwrap()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await.unwrap());
    }

    assert_eq!(count_committed(&results), CONTENDERS);
}
