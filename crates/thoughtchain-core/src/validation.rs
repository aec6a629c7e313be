// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Input validation for submissions and edits.
//!
//! All string inputs are trimmed before their length is checked. Lengths are
//! counted in Unicode scalar values.

use serde::Deserialize;
use utoipa::ToSchema;

use crate::error::ThoughtError;

pub const TOKEN_MIN_LEN: usize = 8;
pub const TOKEN_MAX_LEN: usize = 200;
pub const USERNAME_MAX_LEN: usize = 50;
pub const THOUGHT_TEXT_MAX_LEN: usize = 500;

/// An anonymous submitter token that passed length validation.
///
/// The token identifies a client across requests for the one-per-day rule.
/// It is never rendered in `Debug` output and is not serializable, so it
/// cannot leak into logs or responses by accident.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SubmitterToken(String);

impl SubmitterToken {
    /// Trim and validate a raw token.
    pub fn parse(raw: &str) -> Result<Self, ThoughtError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ThoughtError::validation("token", "Token is required."));
        }
        let len = trimmed.chars().count();
        if !(TOKEN_MIN_LEN..=TOKEN_MAX_LEN).contains(&len) {
            return Err(ThoughtError::validation(
                "token",
                format!(
                    "Token length must be between {TOKEN_MIN_LEN} and {TOKEN_MAX_LEN} characters."
                ),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SubmitterToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SubmitterToken([redacted])")
    }
}

/// The user-visible content of a thought, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThoughtContent {
    pub username: String,
    pub thought_text: String,
}

/// Raw body of a creation request.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct NewThought {
    /// 1 to 50 characters after trimming.
    #[serde(default)]
    pub username: String,
    /// 1 to 500 characters after trimming.
    #[serde(default)]
    pub thought_text: String,
    /// Anonymous client token, 8 to 200 characters. Never echoed back.
    #[serde(default)]
    pub token: String,
}

impl NewThought {
    /// Validate every field, reporting the first failure in field order.
    pub fn validate(&self) -> Result<(SubmitterToken, ThoughtContent), ThoughtError> {
        let username = validate_username(&self.username)?;
        let thought_text = validate_thought_text(&self.thought_text)?;
        let token = SubmitterToken::parse(&self.token)?;
        Ok((
            token,
            ThoughtContent {
                username,
                thought_text,
            },
        ))
    }
}

/// Trim and validate a username (1..=50 characters).
pub fn validate_username(raw: &str) -> Result<String, ThoughtError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ThoughtError::validation("username", "Username cannot be empty."));
    }
    if trimmed.chars().count() > USERNAME_MAX_LEN {
        return Err(ThoughtError::validation(
            "username",
            format!("Username must be at most {USERNAME_MAX_LEN} characters."),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trim and validate thought text (1..=500 characters).
pub fn validate_thought_text(raw: &str) -> Result<String, ThoughtError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ThoughtError::validation(
            "thought_text",
            "Thought text cannot be empty.",
        ));
    }
    if trimmed.chars().count() > THOUGHT_TEXT_MAX_LEN {
        return Err(ThoughtError::validation(
            "thought_text",
            format!("Thought text must be at most {THOUGHT_TEXT_MAX_LEN} characters."),
        ));
    }
    Ok(trimmed.to_string())
}
