//! The polymorphic message accepted by the logging entry points.
//!
//! A [`Message`] is built at the call boundary from whatever the caller has:
//! plain strings convert with `From`, other values pick the capability they
//! should be rendered through with one of the constructors.
//!
//! # Example
//!
//! ```
//! use corelog::Message;
//!
//! let plain = Message::from("Hello world");
//! let shown = Message::display(&42);
//! let nothing: Message = Option::<&str>::None.into();
//!
//! assert!(matches!(plain, Message::Text(_)));
//! assert!(matches!(shown, Message::Display(_)));
//! assert!(nothing.is_nil());
//! ```

use crate::error::BoxError;
use crate::models::Statistics;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

/// A value that can marshal itself into text, and may fail doing so.
pub trait MarshalText {
    /// Returns the textual form of `self` as bytes.
    ///
    /// # Errors
    ///
    /// Returns the reason the value could not be marshaled.
    fn marshal_text(&self) -> Result<Vec<u8>, BoxError>;
}

/// An explicit adapter for types that want to choose how they are rendered.
///
/// Both capabilities default to `None`. When both are present the display
/// text always wins.
pub trait TextAdapter {
    /// Infallible display rendering.
    fn display_text(&self) -> Option<String> {
        None
    }

    /// Fallible text marshaling.
    fn marshal_text(&self) -> Option<Result<Vec<u8>, BoxError>> {
        None
    }
}

/// A value that can be serialized into the structured levels.
///
/// Blanket-implemented for every [`Serialize`] type so callers never
/// implement it by hand; it exists to make the value object safe.
pub trait StructuredValue {
    /// Serializes into compact JSON text.
    ///
    /// # Errors
    ///
    /// Returns the serializer error, including rejected non-finite floats.
    fn to_json(&self) -> Result<String, BoxError>;

    /// Serializes into YAML text.
    ///
    /// # Errors
    ///
    /// Returns the serializer error.
    fn to_yaml(&self) -> Result<String, BoxError>;
}

impl<T: Serialize + ?Sized> StructuredValue for T {
    fn to_json(&self) -> Result<String, BoxError> {
        crate::coerce::structured::json_string(self)
    }

    fn to_yaml(&self) -> Result<String, BoxError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

/// A message to log, classified by how it can be rendered.
#[derive(Clone, Copy)]
pub enum Message<'a> {
    /// No message at all.
    Nil,
    /// Text owned or borrowed by the caller.
    Text(&'a str),
    /// A value rendered through [`fmt::Display`].
    Display(&'a dyn fmt::Display),
    /// A value rendered through [`MarshalText`].
    Marshal(&'a dyn MarshalText),
    /// A value rendered through a [`TextAdapter`].
    Adapter(&'a dyn TextAdapter),
    /// A serializable value.
    Structured(&'a dyn StructuredValue),
    /// A statistics record.
    Statistics(&'a Statistics),
}

impl<'a> Message<'a> {
    /// Wraps a value rendered through its [`fmt::Display`] implementation.
    #[must_use]
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        Self::Display(value)
    }

    /// Wraps a value rendered through its [`MarshalText`] implementation.
    #[must_use]
    pub fn marshal(value: &'a dyn MarshalText) -> Self {
        Self::Marshal(value)
    }

    /// Wraps a value rendered through its [`TextAdapter`] implementation.
    #[must_use]
    pub fn adapter(value: &'a dyn TextAdapter) -> Self {
        Self::Adapter(value)
    }

    /// Wraps any serializable value.
    #[must_use]
    pub fn structured<T: Serialize>(value: &'a T) -> Self {
        Self::Structured(value)
    }

    /// Returns `true` for [`Message::Nil`].
    #[must_use]
    pub const fn is_nil(&self) -> bool {
        matches!(self, Self::Nil)
    }

    /// Returns the variant name for diagnostics.
    #[must_use]
    pub const fn variant(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Text(_) => "text",
            Self::Display(_) => "display",
            Self::Marshal(_) => "marshal",
            Self::Adapter(_) => "adapter",
            Self::Structured(_) => "structured",
            Self::Statistics(_) => "statistics",
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Statistics(stats) => f.debug_tuple("Statistics").field(stats).finish(),
            other => f.write_str(other.variant()),
        }
    }
}

impl<'a> From<&'a str> for Message<'a> {
    fn from(text: &'a str) -> Self {
        Self::Text(text)
    }
}

impl<'a> From<&'a String> for Message<'a> {
    fn from(text: &'a String) -> Self {
        Self::Text(text.as_str())
    }
}

impl<'a> From<&'a Cow<'_, str>> for Message<'a> {
    fn from(text: &'a Cow<'_, str>) -> Self {
        Self::Text(text.as_ref())
    }
}

impl<'a> From<&'a Statistics> for Message<'a> {
    fn from(stats: &'a Statistics) -> Self {
        Self::Statistics(stats)
    }
}

impl<'a, T> From<Option<T>> for Message<'a>
where
    T: Into<Message<'a>>,
{
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Nil, Into::into)
    }
}
