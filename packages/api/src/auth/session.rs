//! Session keys.

/// Key for storing the signed-in user's ID in the session.
pub const SESSION_USER_ID_KEY: &str = "user_id";
