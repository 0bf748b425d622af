//! String coercion chain for the plain text levels.

use crate::error::{BoxError, LogError};
use crate::message::Message;

const NOT_A_STRING: &str = "could not turn message into string";

/// Turns a message into the text logged at [`Level::Stdout`] and
/// [`Level::Stderr`].
///
/// The first matching rule wins:
/// 1. [`Message::Nil`] fails with [`LogError::NilMessage`].
/// 2. [`Message::Text`] is used as is, but an empty string is nil.
/// 3. [`Message::Display`] is used unconditionally.
/// 4. [`Message::Marshal`] is used when marshaling succeeds.
/// 5. [`Message::Adapter`] prefers its display text over marshaling.
/// 6. Everything else is [`LogError::InvalidMessage`].
///
/// [`Level::Stdout`]: crate::Level::Stdout
/// [`Level::Stderr`]: crate::Level::Stderr
///
/// # Errors
///
/// See the rules above.
pub fn coerce_text(message: &Message<'_>) -> Result<String, LogError> {
    match *message {
        Message::Nil => Err(LogError::NilMessage),
        Message::Text("") => Err(LogError::NilMessage),
        Message::Text(text) => Ok(text.to_owned()),
        Message::Display(value) => Ok(value.to_string()),
        Message::Marshal(value) => marshaled(value.marshal_text()),
        Message::Adapter(adapter) => match adapter.display_text() {
            Some(text) => Ok(text),
            None => adapter
                .marshal_text()
                .map_or_else(|| Err(LogError::invalid_message(NOT_A_STRING)), marshaled),
        },
        Message::Structured(_) | Message::Statistics(_) => {
            Err(LogError::invalid_message(NOT_A_STRING))
        }
    }
}

fn marshaled(result: Result<Vec<u8>, BoxError>) -> Result<String, LogError> {
    let bytes = result
        .map_err(|err| LogError::invalid_message_caused_by("could not marshal message", err))?;
    String::from_utf8(bytes)
        .map_err(|err| LogError::invalid_message_caused_by("marshaled message is not UTF-8", err))
}
