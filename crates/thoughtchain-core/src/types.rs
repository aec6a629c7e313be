// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the guard, storage adapters and the gateway.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Timestamp format used for every persisted and rendered instant.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";

/// Render an instant in the canonical UTC timestamp format.
pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// A thought as exposed to readers. Carries no token and no credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Thought {
    pub id: i64,
    pub username: String,
    pub thought_text: String,
    /// UTC, `YYYY-MM-DDTHH:MM:SS.mmmZ`.
    #[schema(example = "2025-11-28T23:59:59.000Z")]
    pub created_at: String,
}

/// A thought ready to be persisted together with its reservation.
#[derive(Debug, Clone)]
pub struct ThoughtDraft {
    pub username: String,
    pub thought_text: String,
    /// Digest of the edit credential; the plaintext never reaches storage.
    pub edit_token_digest: String,
    pub created_at: DateTime<Utc>,
}

/// Result of the store's atomic reserve-and-insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reservation {
    /// The guard record and the thought were committed together.
    Committed(Thought),
    /// The guard record already existed; nothing was written.
    Conflict,
}

/// Response to a successful creation, including the one-time edit credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CreatedThought {
    #[serde(flatten)]
    pub thought: Thought,
    /// Required to edit or delete this thought. Shown only once.
    pub edit_token: String,
}

/// The verdict of a reservation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Admitted(CreatedThought),
    Rejected { day: NaiveDate },
}

impl Verdict {
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted(_))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Admitted(_) => "admitted",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// Acknowledgement of a total wipe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct ClearReport {
    pub thoughts_removed: u64,
    pub reservations_removed: u64,
}

/// Outcome of an edit or delete that is authorized by an edit credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome<T> {
    Applied(T),
    NotFound,
    Forbidden,
}
