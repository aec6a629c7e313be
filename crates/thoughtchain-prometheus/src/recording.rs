// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric registration and recording helpers.
//!
//! Uses the metrics-rs facade so any recorder can collect these metrics.

use metrics::{describe_counter, describe_histogram};

pub const RESERVATIONS_TOTAL: &str = "thoughtchain_reservations_total";
pub const STORAGE_ERRORS_TOTAL: &str = "thoughtchain_storage_errors_total";
pub const CLEARS_TOTAL: &str = "thoughtchain_clears_total";
pub const RESERVE_LATENCY_SECONDS: &str = "thoughtchain_reserve_latency_seconds";

/// Register all Thoughtchain metric descriptions.
///
/// Called once at startup after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        RESERVATIONS_TOTAL,
        "Reservation attempts by verdict (admitted or rejected)"
    );
    describe_counter!(
        STORAGE_ERRORS_TOTAL,
        "Requests that failed because the store was unavailable"
    );
    describe_counter!(CLEARS_TOTAL, "Maintenance clears performed");
    describe_histogram!(
        RESERVE_LATENCY_SECONDS,
        "Time spent in the atomic reserve-and-insert, in seconds"
    );
}

/// Record a reservation verdict (`admitted` or `rejected`).
pub fn record_reservation(verdict: &'static str) {
    metrics::counter!(RESERVATIONS_TOTAL, "verdict" => verdict).increment(1);
}

/// Record a storage failure surfaced to a caller.
pub fn record_storage_error() {
    metrics::counter!(STORAGE_ERRORS_TOTAL).increment(1);
}

/// Record a completed maintenance clear.
pub fn record_clear() {
    metrics::counter!(CLEARS_TOTAL).increment(1);
}

/// Record reserve latency.
pub fn record_reserve_latency(seconds: f64) {
    metrics::histogram!(RESERVE_LATENCY_SECONDS).record(seconds);
}
