//! Data models for the application.

mod note;
mod registration_code;
mod user;

pub use note::Note;
pub use registration_code::RegistrationCode;
pub use user::{User, UserInfo};
