// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-day submission guard.
//!
//! Admission is decided by the store's uniqueness constraint on
//! `(token, day)`, never by a prior lookup. The guard derives the key, issues
//! the edit credential and translates the store's answer into a [`Verdict`].

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::day_key::GuardKey;
use crate::error::ThoughtError;
use crate::secret::EditSecret;
use crate::traits::StorageAdapter;
use crate::types::{ClearReport, CreatedThought, Reservation, ThoughtDraft, Verdict};
use crate::validation::{SubmitterToken, ThoughtContent};

/// Owns admission decisions for thought creation.
#[derive(Clone)]
pub struct SubmissionGuard {
    store: Arc<dyn StorageAdapter>,
}

impl SubmissionGuard {
    pub fn new(store: Arc<dyn StorageAdapter>) -> Self {
        Self { store }
    }

    /// Reserve the `(token, UTC day of now)` key and persist `content` with it.
    ///
    /// `now` must be a server clock reading taken once when the request was
    /// accepted. On [`Verdict::Rejected`] nothing was written.
    pub async fn reserve(
        &self,
        token: &SubmitterToken,
        now: DateTime<Utc>,
        content: ThoughtContent,
    ) -> Result<Verdict, ThoughtError> {
        let key = GuardKey::derive(token, now);
        let secret = EditSecret::generate();
        let draft = ThoughtDraft {
            username: content.username,
            thought_text: content.thought_text,
            edit_token_digest: secret.digest(),
            created_at: now,
        };

        match self.store.reserve(&key, &draft).await? {
            Reservation::Committed(thought) => {
                info!(thought_id = thought.id, day = %key.day(), "thought admitted");
                Ok(Verdict::Admitted(CreatedThought {
                    thought,
                    edit_token: secret.expose().to_string(),
                }))
            }
            Reservation::Conflict => {
                debug!(day = %key.day(), "submission rejected: key already reserved");
                Ok(Verdict::Rejected { day: key.day() })
            }
        }
    }

    /// Wipe every guard record and every thought.
    ///
    /// Access control is the caller's responsibility.
    pub async fn clear(&self) -> Result<ClearReport, ThoughtError> {
        let report = self.store.clear_all().await?;
        info!(
            thoughts_removed = report.thoughts_removed,
            reservations_removed = report.reservations_removed,
            "guard and thoughts cleared"
        );
        Ok(report)
    }
}
