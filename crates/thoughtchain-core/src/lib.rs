// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Thoughtchain service.
//!
//! This crate provides the error taxonomy, the input validation rules, the
//! guard-key derivation and the [`SubmissionGuard`] that enforces "one thought
//! per token per UTC day". Persistence is reached through the
//! [`StorageAdapter`] trait so the guard stays independent of SQLite.

pub mod day_key;
pub mod error;
pub mod guard;
pub mod secret;
pub mod traits;
pub mod types;
pub mod validation;

// Re-export key items at crate root for ergonomic imports.
pub use day_key::GuardKey;
pub use error::{ALREADY_SUBMITTED_TODAY, ThoughtError};
pub use guard::SubmissionGuard;
pub use secret::EditSecret;
pub use traits::{PluginAdapter, StorageAdapter};
pub use types::{
    ClearReport, CreatedThought, EditOutcome, HealthStatus, Reservation, Thought, ThoughtDraft,
    Verdict,
};
pub use validation::{NewThought, SubmitterToken, ThoughtContent};
