//! Level dispatch and payload coercion.
//!
//! [`coerce`] picks the coercion routine for a level's [`Shape`] and returns
//! the payload text, ready for framing.

pub mod structured;
pub mod text;

pub use structured::coerce_structured;
pub use text::coerce_text;

use crate::error::LogError;
use crate::level::{Level, Shape};
use crate::message::Message;

/// Coerces `message` into the payload text for `level`.
///
/// # Errors
///
/// - [`LogError::NotImplemented`] for levels without a payload shape
/// - any error of the coercion routine for the level's shape
pub fn coerce(level: Level, message: &Message<'_>) -> Result<String, LogError> {
    match level.shape() {
        Shape::Text => coerce_text(message),
        Shape::Statistics => coerce_statistics(message),
        Shape::Structured(syntax) => coerce_structured(message, syntax),
        Shape::Unsupported => Err(LogError::NotImplemented(level)),
    }
}

/// Validates and renders a statistics record.
///
/// # Errors
///
/// - [`LogError::InvalidMessage`] if the message is not a statistics record
/// - [`LogError::NilStatisticsKey`] if the record has no key
pub fn coerce_statistics(message: &Message<'_>) -> Result<String, LogError> {
    match *message {
        Message::Statistics(stats) => stats.payload(),
        _ => Err(LogError::invalid_message(format!(
            "statistics level requires a statistics record, got {}",
            message.variant()
        ))),
    }
}
