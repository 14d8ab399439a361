//! Admin role changes.
//!
//! Who may call this is decided by the admin capability check at the HTTP
//! boundary; this module only decides whether a given change is allowed.

use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RoleChangeError {
    #[error("You cannot remove your own admin role here.")]
    SelfDemotion,
}

/// Check a role change requested by admin `actor` on user `target`.
pub fn plan_role_change(actor: Uuid, target: Uuid, make_admin: bool) -> Result<(), RoleChangeError> {
    if actor == target && !make_admin {
        return Err(RoleChangeError::SelfDemotion);
    }
    Ok(())
}
