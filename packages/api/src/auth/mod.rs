//! Authentication and account policies.
//!
//! Password hashing, session keys, the signup flow, and the two pure policies
//! that decide account self-service updates and admin role changes.

pub mod account;
pub mod password;
pub mod roles;
mod session;
pub mod signup;

pub use account::{
    plan_account_update, AccountChanges, AccountUpdateRequest, CurrentCredentials, Decision,
    RejectReason,
};
pub use password::{hash_password, verify_password, PasswordError, MIN_PASSWORD_LENGTH};
pub use roles::{plan_role_change, RoleChangeError};
pub use session::SESSION_USER_ID_KEY;
pub use signup::{register_user, validate_signup, SignupError, SignupForm};

/// Canonical form of an email address as stored in the `users` table.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Shape check for a normalized email: one `@` with something on both sides,
/// no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[test]
    fn test_valid_emails() {
        for email in ["ada@example.com", "a.b+notes@sub.example.org"] {
            assert!(is_valid_email(email), "{email}");
        }
    }

    #[test]
    fn test_invalid_emails() {
        for email in ["", "   ", "not-an-email", "@example.com", "ada@", "a@b@c", "ada lovelace@example.com"] {
            assert!(!is_valid_email(email), "{email:?}");
        }
    }
}
