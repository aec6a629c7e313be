// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A week in the life of the thought chain, driven through the full stack.

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Utc};
use serde_json::json;
use thoughtchain_test_utils::TestHarness;

fn at(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

#[tokio::test]
async fn three_writers_over_three_days() {
    let h = TestHarness::builder()
        .with_now(at("2025-03-01T08:00:00Z"))
        .with_maintenance(true)
        .build()
        .await
        .unwrap();

    // Day one: everyone posts once, a second try is refused.
    let mut day_one = Vec::new();
    for (name, token) in [("ada", "ada-token-1"), ("bo", "bo-token-22"), ("cy", "cy-token-333")] {
        let created = h.create(name, &format!("{name} on day one"), token).await;
        assert_eq!(created.status, StatusCode::CREATED, "{}", created.text);
        day_one.push(created.body);
        h.clock.advance_seconds(60);
    }
    let again = h.create("ada", "one more", "ada-token-1").await;
    assert_eq!(again.status, StatusCode::CONFLICT);

    // Day two: ada writes, then edits the new thought with the returned credential.
    h.clock.set(at("2025-03-02T00:00:00Z"));
    let created = h.create("ada", "draft", "ada-token-1").await;
    assert_eq!(created.status, StatusCode::CREATED);
    let id = created.body["id"].as_i64().unwrap();
    let edit_token = created.body["edit_token"].as_str().unwrap().to_string();

    let edited = h
        .send(
            Method::PATCH,
            &format!("/thoughts/{id}"),
            Some(json!({ "thought_text": "final" })),
            &[("x-edit-token", edit_token.as_str())],
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["thought_text"], "final");

    // bo deletes the day-one post. Day two is still open for bo.
    let bo_id = day_one[1]["id"].as_i64().unwrap();
    let bo_secret = day_one[1]["edit_token"].as_str().unwrap();
    let deleted = h
        .send(
            Method::DELETE,
            &format!("/thoughts/{bo_id}?token={bo_secret}"),
            None,
            &[],
        )
        .await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);

    let listed = h.list().await;
    let thoughts = listed.body.as_array().unwrap();
    assert_eq!(thoughts.len(), 3);
    assert_eq!(thoughts[0]["username"], "ada");
    assert_eq!(thoughts[1]["username"], "cy");
    assert_eq!(thoughts[2]["thought_text"], "final");

    let bo = h.create("bo", "bo on day two", "bo-token-22").await;
    assert_eq!(bo.status, StatusCode::CREATED);

    // Day three: the clear wipes thoughts and every reservation.
    h.clock.set(at("2025-03-03T12:00:00Z"));
    let cleared = h
        .send(Method::DELETE, "/admin/dev/clear-thoughts", None, &[])
        .await;
    assert_eq!(cleared.status, StatusCode::OK);
    assert_eq!(cleared.body["thoughts_removed"], 4);
    assert_eq!(cleared.body["reservations_removed"], 5);

    assert_eq!(h.list().await.body, json!([]));
    let fresh = h.create("cy", "cy on day three", "cy-token-333").await;
    assert_eq!(fresh.status, StatusCode::CREATED);
}

#[tokio::test]
async fn clear_reopens_the_current_day() {
    let h = TestHarness::builder()
        .with_now(at("2025-06-10T15:30:00Z"))
        .with_maintenance(true)
        .build()
        .await
        .unwrap();

    assert_eq!(
        h.create("ada", "before", "ada-token-1").await.status,
        StatusCode::CREATED
    );
    assert_eq!(
        h.create("ada", "blocked", "ada-token-1").await.status,
        StatusCode::CONFLICT
    );

    let cleared = h
        .send(Method::DELETE, "/admin/dev/clear-thoughts", None, &[])
        .await;
    assert_eq!(cleared.status, StatusCode::OK);

    let after = h.create("ada", "after clear", "ada-token-1").await;
    assert_eq!(after.status, StatusCode::CREATED);
    assert_eq!(h.list().await.body.as_array().unwrap().len(), 1);
}
