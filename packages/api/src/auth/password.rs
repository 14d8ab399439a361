//! # Password hashing and verification — Argon2id
//!
//! Every password the service stores goes through [`hash_password`], both at
//! signup and when the account policy approves a new password. The result is a
//! PHC-format string (e.g. `$argon2id$v=19$m=19456,t=2,p=1$...`) kept in the
//! `password_hash` column of the `users` table.
//!
//! - [`hash_password`] — fresh random salt from [`OsRng`], default Argon2id parameters.
//! - [`verify_password`] — parses a stored PHC string and checks a plaintext
//!   against it. `Ok(false)` on mismatch, `Err` only when the stored hash is malformed.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("failed to hash password: {0}")]
    Hash(argon2::password_hash::Error),
    #[error("invalid password hash: {0}")]
    InvalidHash(argon2::password_hash::Error),
}

/// Hash a password using Argon2id. Returns a PHC-format string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(PasswordError::Hash)?;
    Ok(hash.to_string())
}

/// Verify a password against a PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(PasswordError::InvalidHash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Whether a plaintext password is long enough to be accepted.
pub fn is_long_enough(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_LENGTH
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("battery staple", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(PasswordError::InvalidHash(_))
        ));
    }

    #[test]
    fn test_length_counts_chars() {
        assert!(!is_long_enough("1234567"));
        assert!(is_long_enough("12345678"));
        // 8 multi-byte characters
        assert!(is_long_enough("ääääääää"));
    }
}
