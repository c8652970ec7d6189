//! This file defines the type that stores and verifies password hashes.
//!
//! Passwords are hashed with a single, unsalted SHA-256 digest so that
//! databases created by earlier versions of the app keep working. This is only
//! suitable for a trusted, single-user deployment. A salted, memory-hard KDF
//! should replace it before the app is exposed to untrusted networks.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A hashed password, stored as a lowercase hex string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `raw_password`.
    ///
    /// The same password always produces the same hash.
    pub fn from_raw_password(raw_password: &str) -> Self {
        Self(format!("{:x}", Sha256::digest(raw_password.as_bytes())))
    }

    /// Create a new `PasswordHash` without any validation.
    ///
    /// The caller should ensure that `raw_password_hash` is a valid password hash.
    ///
    /// This function has `_unchecked` in the name but is not `unsafe`, because if an invalid hash is provided it will cause incorrect behaviour but not affect memory safety.
    pub fn new_unchecked(raw_password_hash: &str) -> Self {
        Self(raw_password_hash.to_string())
    }

    /// Check that `raw_password` matches the stored password.
    pub fn verify(&self, raw_password: &str) -> bool {
        Self::from_raw_password(raw_password) == *self
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_hash_tests {
    use super::PasswordHash;

    #[test]
    fn hash_matches_known_sha256_digest() {
        let hash = PasswordHash::from_raw_password("hunter2");

        assert_eq!(
            hash.as_ref(),
            "f52fbd32b2b3b86ff88ef6c490628285f482af15ddcb29541f94bcf526a3f6c7"
        );
    }

    #[test]
    fn verify_password_succeeds_for_valid_password() {
        let hash = PasswordHash::from_raw_password("okon");

        assert!(hash.verify("okon"));
    }

    #[test]
    fn verify_password_fails_for_invalid_password() {
        let hash = PasswordHash::from_raw_password("okon");

        assert!(!hash.verify("thewrongpassword"));
    }

    #[test]
    fn hashing_is_deterministic() {
        let hash = PasswordHash::from_raw_password("turkeysgogobblegobble");
        let dupe_hash = PasswordHash::from_raw_password("turkeysgogobblegobble");

        assert_eq!(hash, dupe_hash);
    }
}
