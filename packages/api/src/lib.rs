//! # API crate — domain logic for the Notebook service
//!
//! Everything the HTTP server in the `web` crate needs, without any HTTP
//! framework: data models, database queries, and the policies that decide
//! what a request is allowed to do.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`auth`] | Argon2id password hashing, invite-gated signup, the account self-service policy, admin role changes, session keys |
//! | [`db`] | PostgreSQL pool and the queries on `users` and `notes` |
//! | [`models`] | Row types (`User`, `Note`, `RegistrationCode`) and the client-safe `UserInfo` |
//! | [`notes`] | Validating and sanitizing submitted notes, the delete rule |
//! | [`preferences`] | Typed light/dark preference carried in a cookie |
//! | [`profile_image`] | SSRF-guarded download of profile images by URL |
//! | [`sanitizer`] | Allow-list HTML cleaning for note content |
//! | [`settings`] | Layered configuration (defaults, `config.toml`, environment) |
//!
//! The two policies with real rules in them, [`auth::plan_account_update`] and
//! [`profile_image::ImageFetcher::fetch_inline_image`], do not depend on each
//! other and are tested without a database or network.

pub mod auth;
pub mod db;
pub mod models;
pub mod notes;
pub mod preferences;
pub mod profile_image;
pub mod sanitizer;
pub mod settings;

pub use models::{Note, User, UserInfo};
pub use preferences::{Mode, Preferences};
pub use settings::Settings;
