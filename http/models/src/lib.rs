#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

#[cfg(feature = "reqwest")]
pub mod reqwest;

use std::num::NonZeroU16;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
    Connect,
    Trace,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_ref())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid status code: {0}")]
pub struct InvalidStatusCode(pub u16);

/// Numeric HTTP status code as returned by the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatusCode(pub NonZeroU16);

impl StatusCode {
    pub const OK: Self = Self(NonZeroU16::new(200).unwrap());

    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0.get()
    }

    /// `true` for any code in `200..=299`.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.as_u16(), 200..=299)
    }

    /// The registered reason phrase for this code, e.g. `"Not Found"` for `404`.
    ///
    /// Returns `None` for codes without a registered phrase.
    #[cfg(feature = "reqwest")]
    #[must_use]
    pub fn canonical_reason(&self) -> Option<&'static str> {
        ::reqwest::StatusCode::from_u16(self.as_u16())
            .ok()
            .and_then(|x| x.canonical_reason())
    }
}

impl TryFrom<u16> for StatusCode {
    type Error = InvalidStatusCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        NonZeroU16::new(value)
            .map(Self)
            .ok_or(InvalidStatusCode(value))
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u16())
    }
}
