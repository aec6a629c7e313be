// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Thoughtchain service.

use chrono::NaiveDate;
use thiserror::Error;

/// Message returned to a submitter whose token already produced a thought today.
pub const ALREADY_SUBMITTED_TODAY: &str =
    "This token has already submitted a thought today (UTC). Try again tomorrow.";

/// The primary error type used across the guard, storage and gateway layers.
#[derive(Debug, Error)]
pub enum ThoughtError {
    /// Request input failed validation (missing fields, length bounds).
    #[error("{message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The (token, day) key already holds a reservation.
    ///
    /// This is the normal outcome of a second submission on the same UTC day
    /// and must never be treated as a system failure.
    #[error("{}", ALREADY_SUBMITTED_TODAY)]
    GuardConflict { day: NaiveDate },

    /// Storage backend errors (connection, query failure, aborted transaction).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The addressed thought does not exist.
    #[error("Thought not found.")]
    NotFound { id: i64 },

    /// An edit or delete was attempted without an edit token.
    #[error("Missing edit token.")]
    EditTokenMissing,

    /// An edit or delete was attempted with the wrong edit token.
    #[error("Invalid edit token.")]
    EditTokenInvalid,

    /// Configuration errors surfaced at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ThoughtError {
    /// Build a validation error for `field`.
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Wrap any error as a storage failure.
    pub fn storage<E>(source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage {
            source: source.into(),
        }
    }

    /// Whether the caller may retry the same request later and expect it to succeed.
    ///
    /// Storage failures are retryable. Validation, conflict and authorization
    /// failures are properties of the request itself.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Storage { .. })
    }

    /// Whether this error is an expected outcome of correct operation.
    pub fn is_expected(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::GuardConflict { .. }
                | Self::NotFound { .. }
                | Self::EditTokenMissing
                | Self::EditTokenInvalid
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_conflict_renders_retry_tomorrow_message() {
        let err = ThoughtError::GuardConflict {
            day: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
        };
        assert_eq!(err.to_string(), ALREADY_SUBMITTED_TODAY);
        assert!(err.is_expected());
        assert!(!err.is_retryable());
    }

    #[test]
    fn storage_errors_are_retryable_and_unexpected() {
        let err = ThoughtError::storage(std::io::Error::other("disk gone"));
        assert!(err.is_retryable());
        assert!(!err.is_expected());
        assert!(err.to_string().contains("disk gone"));
    }

    #[test]
    fn validation_message_is_the_display() {
        let err = ThoughtError::validation("token", "Token is required.");
        assert_eq!(err.to_string(), "Token is required.");
        assert!(!err.is_retryable());
    }
}
