// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing (Argon2id, PHC string format).
//!
//! Hashing and verification are CPU-bound (tens of milliseconds); async
//! callers run them on the blocking pool.

use std::sync::LazyLock;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use super::AuthError;

/// Hash a password with a fresh random salt.
///
/// The returned PHC string embeds algorithm, cost parameters and salt, so
/// it is all `verify_password` needs.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::InternalError(format!("Failed to hash password: {e}")))
}

/// Verify a password against a stored hash.
///
/// Returns `false` for a mismatch and for a hash that cannot be parsed.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(password_hash) else {
        tracing::warn!("Stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

/// Hash with the same parameters as real accounts, checked when a login names
/// an unknown email.
static DUMMY_HASH: LazyLock<Option<String>> =
    LazyLock::new(|| hash_password("gramaconnect-dummy-password").ok());

/// Spend the cost of one verification without a stored hash.
///
/// Keeps an unknown email as slow as a wrong password. Always returns `false`.
pub fn verify_dummy_password(password: &str) -> bool {
    match DUMMY_HASH.as_deref() {
        Some(hash) => {
            let _ = verify_password(password, hash);
        }
        None => tracing::warn!("Dummy password hash unavailable"),
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("secure_password123").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secure_password123", &hash));
        assert!(!verify_password("wrong_password", &hash));
    }

    #[test]
    fn salt_is_fresh_per_call() {
        let first = hash_password("same").unwrap();
        let second = hash_password("same").unwrap();
        assert_ne!(first, second);
        assert!(verify_password("same", &first));
        assert!(verify_password("same", &second));
    }

    #[test]
    fn dummy_hash_matches_account_parameters() {
        let dummy = DUMMY_HASH.as_deref().unwrap();
        let real = hash_password("whatever").unwrap();

        let dummy = PasswordHash::new(dummy).unwrap();
        let real = PasswordHash::new(&real).unwrap();
        assert_eq!(dummy.algorithm, real.algorithm);
        assert_eq!(dummy.params, real.params);
    }

    #[test]
    fn dummy_verification_never_succeeds() {
        assert!(!verify_dummy_password("gramaconnect-dummy-password"));
        assert!(!verify_dummy_password(""));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("anything", "not-a-hash"));
        assert!(!verify_password("anything", ""));
    }
}
