//! Password hashing with argon2
//!
//! Raw passwords are never stored. A missing password is recorded as an
//! unusable marker that no input verifies against.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::{Rng, distributions::Alphanumeric};
use thiserror::Error;

/// Prefix of an encoded password that can never match
pub const UNUSABLE_PASSWORD_PREFIX: char = '!';

/// Random characters appended after [`UNUSABLE_PASSWORD_PREFIX`]
const UNUSABLE_PASSWORD_SUFFIX_LENGTH: usize = 40;

/// Password hashing failure
#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    Hash(String),
}

/// Hash `raw_password` with a fresh random salt
pub fn hash_password(raw_password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();
    let password_hash = argon2
        .hash_password(raw_password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(password_hash)
}

/// Encode a password for storage; `None` produces an unusable marker
pub fn make_password(raw_password: Option<&str>) -> Result<String, PasswordError> {
    match raw_password {
        Some(raw) => hash_password(raw),
        None => {
            let suffix: String = rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(UNUSABLE_PASSWORD_SUFFIX_LENGTH)
                .map(char::from)
                .collect();
            Ok(format!("{}{}", UNUSABLE_PASSWORD_PREFIX, suffix))
        }
    }
}

pub fn is_password_usable(encoded: &str) -> bool {
    !encoded.starts_with(UNUSABLE_PASSWORD_PREFIX)
}

/// Check `raw_password` against an encoded hash
///
/// Unusable markers and malformed hashes never verify.
pub fn verify_password(raw_password: &str, encoded: &str) -> bool {
    if !is_password_usable(encoded) {
        return false;
    }

    let Ok(parsed_hash) = PasswordHash::new(encoded) else {
        return false;
    };

    Argon2::default()
        .verify_password(raw_password.as_bytes(), &parsed_hash)
        .is_ok()
}
