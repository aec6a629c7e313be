// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Thoughtchain integration tests.
//!
//! # Components
//!
//! - [`TestHarness`] - temp SQLite store, controllable clock and a ready router
//! - [`MutableClock`] - a `mockable::Clock` that tests can move forward

pub mod clock;
pub mod harness;

pub use clock::MutableClock;
pub use harness::{TestHarness, TestResponse};
