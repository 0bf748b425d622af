//! Error types returned by the logging entry points.

use crate::level::Level;
use std::io;
use thiserror::Error;

/// A boxed error used as the cause of a failed coercion.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while coercing, framing or writing a log message.
///
/// Nothing is written to the sink when any of these is returned, except for
/// [`LogError::Io`], which reports that the sink itself failed.
#[derive(Debug, Error)]
pub enum LogError {
    /// The level is not one of the recognized wire values.
    #[error("logging level not valid: {0}")]
    InvalidLevel(u8),

    /// The message was absent, or an empty string where text is required.
    #[error("message was nil")]
    NilMessage,

    /// The message could not be coerced into the shape the level requires.
    #[error("{reason}")]
    InvalidMessage {
        /// Human readable description of what went wrong.
        reason: String,
        /// The underlying cause, when there is one.
        #[source]
        source: Option<BoxError>,
    },

    /// The statistics record has an empty key.
    #[error("statistics key was missing")]
    NilStatisticsKey,

    /// The statistics record carries an unrecognized aggregation code.
    #[error("invalid aggregation type: '{0}'")]
    InvalidAggregationType(String),

    /// The level is recognized but intentionally unsupported.
    #[error("logging level {0} is not implemented")]
    NotImplemented(Level),

    /// Writing the framed record to the sink failed.
    #[error("failed to write log record: {0}")]
    Io(#[from] io::Error),
}

/// The kind of a [`LogError`], without its payload.
///
/// Useful for comparing errors, since causes are not comparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// See [`LogError::InvalidLevel`].
    InvalidLevel,
    /// See [`LogError::NilMessage`].
    NilMessage,
    /// See [`LogError::InvalidMessage`].
    InvalidMessage,
    /// See [`LogError::NilStatisticsKey`].
    NilStatisticsKey,
    /// See [`LogError::InvalidAggregationType`].
    InvalidAggregationType,
    /// See [`LogError::NotImplemented`].
    NotImplemented,
    /// See [`LogError::Io`].
    Io,
}

impl LogError {
    /// Creates an [`LogError::InvalidMessage`] without an underlying cause.
    #[must_use]
    pub fn invalid_message(reason: impl Into<String>) -> Self {
        Self::InvalidMessage {
            reason: reason.into(),
            source: None,
        }
    }

    /// Creates an [`LogError::InvalidMessage`] wrapping `source`.
    #[must_use]
    pub fn invalid_message_caused_by(
        reason: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::InvalidMessage {
            reason: reason.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidLevel(_) => ErrorKind::InvalidLevel,
            Self::NilMessage => ErrorKind::NilMessage,
            Self::InvalidMessage { .. } => ErrorKind::InvalidMessage,
            Self::NilStatisticsKey => ErrorKind::NilStatisticsKey,
            Self::InvalidAggregationType(_) => ErrorKind::InvalidAggregationType,
            Self::NotImplemented(_) => ErrorKind::NotImplemented,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}
