//! # Database module — PostgreSQL pool and queries
//!
//! [`connect`] opens the pool from [`crate::settings::Database`]; the web binary
//! keeps it in its shared state and hands `&PgPool` to the query functions.
//!
//! | Module | Tables |
//! |--------|--------|
//! | [`users`] | `users` |
//! | [`notes`] | `notes` |
//!
//! Registration codes are only ever consumed inside the signup transaction,
//! see [`crate::auth::signup`].

mod pool;

pub mod notes;
pub mod users;

pub use pool::connect;

/// SQLSTATE for `unique_violation`.
pub(crate) const UNIQUE_VIOLATION: &str = "23505";

/// Whether `err` is a unique-constraint violation.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|e| e.code())
        .is_some_and(|code| code == UNIQUE_VIOLATION)
}
