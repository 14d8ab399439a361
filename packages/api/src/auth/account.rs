//! # Account self-service — deciding what an update may change
//!
//! [`plan_account_update`] takes the stored credentials of the signed-in user and
//! the submitted form, and returns a [`Decision`]. It performs no I/O: the
//! caller looks up whether the new email belongs to someone else, passes the
//! answer in through `email_in_use`, and persists an approved
//! [`AccountChanges`] itself.
//!
//! ## Rules, in evaluation order
//!
//! | Step | Condition | Outcome |
//! |------|-----------|---------|
//! | 1 | neither email nor password changes | approved, nothing to persist |
//! | 2 | current password missing | [`RejectReason::ReauthRequired`] |
//! | 3 | current password does not verify | [`RejectReason::WrongPassword`] |
//! | 4 | new email owned by another account | [`RejectReason::EmailInUse`] |
//! | 5 | confirmation differs | [`RejectReason::PasswordMismatch`] |
//! | 6 | new password under 8 characters | [`RejectReason::PasswordTooShort`] |
//! | 7 | new password equals the current one | [`RejectReason::PasswordUnchanged`] |
//!
//! The admin flag is not part of [`AccountUpdateRequest`] nor of
//! [`AccountChanges`], so self-service can never touch it.

use serde::Deserialize;

use super::normalize_email;
use super::password::{hash_password, is_long_enough, verify_password, PasswordError};

/// What the store currently holds for the signed-in user.
#[derive(Debug, Clone, Copy)]
pub struct CurrentCredentials<'a> {
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Fields submitted on the account page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AccountUpdateRequest {
    pub email: String,
    #[serde(default)]
    pub old_password: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub password_control: Option<String>,
}

/// Columns to write back. `None` leaves a column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password_hash.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    #[error("Please enter your current password to update email or password.")]
    ReauthRequired,
    #[error("Current password is incorrect.")]
    WrongPassword,
    #[error("This email address is already in use by another account.")]
    EmailInUse,
    #[error("New passwords do not match.")]
    PasswordMismatch,
    #[error("Password must be at least 8 characters long.")]
    PasswordTooShort,
    #[error("New password must differ from the current password.")]
    PasswordUnchanged,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Approved(AccountChanges),
    Rejected(RejectReason),
}

/// Decide whether an account update is authorized and consistent.
///
/// `email_in_use` is only consulted when the email actually changes, and must
/// answer for accounts other than the current user. The error channel carries
/// internal hashing failures only; every user-facing refusal is a
/// [`Decision::Rejected`].
pub fn plan_account_update(
    current: &CurrentCredentials<'_>,
    request: &AccountUpdateRequest,
    email_in_use: impl FnOnce(&str) -> bool,
) -> Result<Decision, PasswordError> {
    let new_email = normalize_email(&request.email);
    let new_email = new_email.as_str();
    let new_password = request.password.as_deref().filter(|p| !p.is_empty());

    let email_changed = new_email != current.email;
    let password_change_requested = new_password.is_some();

    if !email_changed && !password_change_requested {
        return Ok(Decision::Approved(AccountChanges::default()));
    }

    let Some(old_password) = request.old_password.as_deref().filter(|p| !p.is_empty()) else {
        return Ok(Decision::Rejected(RejectReason::ReauthRequired));
    };
    if !verifies(old_password, current.password_hash) {
        return Ok(Decision::Rejected(RejectReason::WrongPassword));
    }

    let mut changes = AccountChanges::default();

    if email_changed {
        if email_in_use(new_email) {
            return Ok(Decision::Rejected(RejectReason::EmailInUse));
        }
        changes.email = Some(new_email.to_string());
    }

    if let Some(new_password) = new_password {
        if request.password_control.as_deref() != Some(new_password) {
            return Ok(Decision::Rejected(RejectReason::PasswordMismatch));
        }
        if !is_long_enough(new_password) {
            return Ok(Decision::Rejected(RejectReason::PasswordTooShort));
        }
        if verifies(new_password, current.password_hash) {
            return Ok(Decision::Rejected(RejectReason::PasswordUnchanged));
        }
        changes.password_hash = Some(hash_password(new_password)?);
    }

    Ok(Decision::Approved(changes))
}

/// A stored hash that cannot be parsed never authenticates anyone.
fn verifies(password: &str, hash: &str) -> bool {
    verify_password(password, hash).unwrap_or_else(|e| {
        tracing::warn!(error = %e, "stored password hash is unreadable");
        false
    })
}
