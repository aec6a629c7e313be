// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Derivation of the per-day guard key.
//!
//! A guard key is the pair `(token, UTC calendar date)`. The date is always
//! taken from a server-side clock reading, never from anything the client
//! sends, and day boundaries fall exactly on UTC midnight.

use chrono::{DateTime, NaiveDate, Utc};

use crate::validation::SubmitterToken;

/// Storage format of the day component (`YYYY-MM-DD`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// The canonical identity of one reservation.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct GuardKey {
    token: SubmitterToken,
    day: NaiveDate,
}

impl GuardKey {
    /// Derive the key for `token` at instant `now`.
    pub fn derive(token: &SubmitterToken, now: DateTime<Utc>) -> Self {
        Self {
            token: token.clone(),
            day: now.date_naive(),
        }
    }

    pub fn token(&self) -> &SubmitterToken {
        &self.token
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// The day rendered the way the guard table stores it.
    pub fn day_key(&self) -> String {
        self.day.format(DAY_KEY_FORMAT).to_string()
    }
}

impl std::fmt::Debug for GuardKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardKey")
            .field("token", &self.token)
            .field("day", &self.day)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> SubmitterToken {
        SubmitterToken::parse("a1b2c3d4e5f6g7h8").unwrap()
    }

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn day_is_the_utc_calendar_date() {
        let key = GuardKey::derive(&token(), at("2025-11-28T23:59:59Z"));
        assert_eq!(key.day(), NaiveDate::from_ymd_opt(2025, 11, 28).unwrap());
        assert_eq!(key.day_key(), "2025-11-28");
    }

    #[test]
    fn boundary_is_exact_utc_midnight() {
        let before = GuardKey::derive(&token(), at("2025-11-28T23:59:59.999Z"));
        let after = GuardKey::derive(&token(), at("2025-11-29T00:00:00.001Z"));
        assert_ne!(before, after);
        assert_eq!(after.day_key(), "2025-11-29");
    }

    #[test]
    fn offset_instants_are_converted_to_utc_first() {
        // 01:30 in UTC+02:00 is still the previous UTC day.
        let local = DateTime::parse_from_rfc3339("2025-11-29T01:30:00+02:00").unwrap();
        let key = GuardKey::derive(&token(), local.with_timezone(&Utc));
        assert_eq!(key.day_key(), "2025-11-28");
    }

    #[test]
    fn same_token_same_day_yields_equal_keys() {
        let a = GuardKey::derive(&token(), at("2025-11-28T00:00:00Z"));
        let b = GuardKey::derive(&token(), at("2025-11-28T12:34:56Z"));
        assert_eq!(a, b);
    }

    #[test]
    fn debug_output_redacts_token() {
        let key = GuardKey::derive(&token(), at("2025-11-28T00:00:00Z"));
        let debug = format!("{key:?}");
        assert!(!debug.contains("a1b2c3d4e5f6g7h8"));
        assert!(debug.contains("2025-11-28"));
    }
}
