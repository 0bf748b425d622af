//! Log levels understood by the 0-Core log monitor.
//!
//! The numeric value of each level is part of the wire format and must not
//! change.

use crate::error::LogError;
use serde::{Deserialize, Serialize};

/// The level a message is logged at.
///
/// The level decides which payload shape is accepted, see [`Level::shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Level {
    /// Plain text destined for the monitored process' stdout.
    Stdout = 1,
    /// Plain text destined for the monitored process' stderr.
    Stderr = 2,
    /// A statistics record.
    Statistics = 10,
    /// A JSON result message.
    Json = 20,
    /// A YAML result message.
    Yaml = 21,
    /// A TOML result message. Recognized but not implemented.
    Toml = 22,
}

/// Serialization syntax of a structured level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Syntax {
    /// `serde_json` output.
    Json,
    /// `serde_yaml_ng` output.
    Yaml,
}

/// The payload shape a level requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Anything coercible into a non-empty string.
    Text,
    /// A [`Statistics`](crate::models::Statistics) record.
    Statistics,
    /// Any serializable value.
    Structured(Syntax),
    /// The level has no implemented payload shape.
    Unsupported,
}

impl Level {
    /// All recognized levels, in ascending wire order.
    pub const ALL: [Level; 6] = [
        Self::Stdout,
        Self::Stderr,
        Self::Statistics,
        Self::Json,
        Self::Yaml,
        Self::Toml,
    ];

    /// Returns the numeric wire value of this level.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self as u8
    }

    /// Returns the payload shape this level accepts.
    #[must_use]
    pub const fn shape(self) -> Shape {
        match self {
            Self::Stdout | Self::Stderr => Shape::Text,
            Self::Statistics => Shape::Statistics,
            Self::Json => Shape::Structured(Syntax::Json),
            Self::Yaml => Shape::Structured(Syntax::Yaml),
            Self::Toml => Shape::Unsupported,
        }
    }

    /// Returns a lowercase name for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Stdout => "stdout",
            Self::Stderr => "stderr",
            Self::Statistics => "statistics",
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = LogError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_u8() == value)
            .ok_or(LogError::InvalidLevel(value))
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.as_u8()
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_u8())
    }
}

/// Conversion into a [`Level`] for the logging entry points.
///
/// Implemented for [`Level`] itself, which never fails, and for raw `u8`
/// wire values, which fail with [`LogError::InvalidLevel`] when unknown.
pub trait IntoLevel {
    /// Converts `self` into a recognized level.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::InvalidLevel`] if the value is not recognized.
    fn into_level(self) -> Result<Level, LogError>;
}

impl IntoLevel for Level {
    fn into_level(self) -> Result<Level, LogError> {
        Ok(self)
    }
}

impl IntoLevel for u8 {
    fn into_level(self) -> Result<Level, LogError> {
        Level::try_from(self)
    }
}
