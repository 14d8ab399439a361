//! # Display preferences stored client-side
//!
//! The `preferences` cookie holds a [`Preferences`] value encoded as URL-safe
//! base64 of a JSON object with a fixed schema:
//!
//! ```json
//! {"mode": "light"}
//! ```
//!
//! Decoding is strict: unknown keys and unknown modes are rejected, and
//! [`Preferences::from_cookie`] answers with the default for anything it cannot
//! read. Nothing from the cookie is ever turned into an open-ended structure.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the encoded preferences.
pub const PREFERENCES_COOKIE: &str = "preferences";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Preferences {
    #[serde(default)]
    pub mode: Mode,
}

impl Preferences {
    /// Flip between light and dark mode.
    pub fn toggle(self) -> Self {
        let mode = match self.mode {
            Mode::Light => Mode::Dark,
            Mode::Dark => Mode::Light,
        };
        Self { mode }
    }

    /// Encode for the cookie value.
    pub fn to_cookie(&self) -> String {
        // Serializing a struct with a unit enum field cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    /// Decode a cookie value, falling back to the default when it is unreadable.
    pub fn from_cookie(value: &str) -> Self {
        Self::decode(value).unwrap_or_else(|| {
            tracing::debug!("ignoring unreadable preferences cookie");
            Self::default()
        })
    }

    fn decode(value: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(value.trim()).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}
