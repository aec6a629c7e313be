// SPDX-FileCopyrightText: 2026 Thoughtchain Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edit credentials issued at creation time.
//!
//! The plaintext credential is returned to the creator exactly once. Only its
//! SHA-256 digest is persisted, so the stored row cannot be used to forge
//! edits and nothing about it is derived from the submitter token.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

/// Number of random bytes in a freshly generated credential.
const EDIT_SECRET_BYTES: usize = 16;

/// A plaintext edit credential.
#[derive(Clone, PartialEq, Eq)]
pub struct EditSecret(String);

impl EditSecret {
    /// Generate a new random credential (base64url, no padding).
    pub fn generate() -> Self {
        let mut bytes = [0u8; EDIT_SECRET_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(URL_SAFE_NO_PAD.encode(bytes))
    }

    /// Wrap a credential presented by a client.
    pub fn from_presented(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Hex-encoded SHA-256 digest used for storage and comparison.
    pub fn digest(&self) -> String {
        hex::encode(Sha256::digest(self.0.as_bytes()))
    }
}

impl std::fmt::Debug for EditSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("EditSecret([redacted])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_secrets_are_urlsafe_and_distinct() {
        let a = EditSecret::generate();
        let b = EditSecret::generate();
        assert_ne!(a, b);
        // 16 bytes -> 22 base64 characters without padding.
        assert_eq!(a.expose().len(), 22);
        assert!(
            a.expose()
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn digest_is_stable_and_hides_plaintext() {
        let secret = EditSecret::from_presented("abc").unwrap();
        assert_eq!(
            secret.digest(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert!(!secret.digest().contains("abc"));
    }

    #[test]
    fn blank_presented_secret_is_absent() {
        assert!(EditSecret::from_presented("  ").is_none());
        assert_eq!(
            EditSecret::from_presented(" tok ").unwrap().expose(),
            "tok"
        );
    }
}
