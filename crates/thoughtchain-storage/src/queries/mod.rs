// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for guard records and thoughts.

pub mod guard;
pub mod thoughts;
