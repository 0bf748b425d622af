//! Structured (JSON and YAML) coercion.
//!
//! `serde_json` writes non-finite floats as `null`, which silently changes the
//! value. [`json_string`] walks the value with [`FiniteGuard`] first and
//! refuses such values instead.

use crate::coerce::text::coerce_text;
use crate::error::{BoxError, LogError};
use crate::level::Syntax;
use crate::message::{Message, StructuredValue};
use serde::ser::{self, Serialize};
use thiserror::Error;

/// Turns a message into the text logged at a structured level.
///
/// # Errors
///
/// - [`LogError::NilMessage`] for [`Message::Nil`]
/// - [`LogError::InvalidMessage`] when serialization fails, wrapping the cause
/// - any error of the text chain or statistics validation for those variants
pub fn coerce_structured(message: &Message<'_>, syntax: Syntax) -> Result<String, LogError> {
    match *message {
        Message::Nil => Err(LogError::NilMessage),
        Message::Structured(value) => serialize(value, syntax),
        Message::Statistics(stats) => {
            stats.validate_record()?;
            serialize(stats, syntax)
        }
        Message::Text(_) | Message::Display(_) | Message::Marshal(_) | Message::Adapter(_) => {
            let text = coerce_text(message)?;
            serialize(&text, syntax)
        }
    }
}

fn serialize(value: &dyn StructuredValue, syntax: Syntax) -> Result<String, LogError> {
    let result = match syntax {
        Syntax::Json => value.to_json(),
        Syntax::Yaml => value.to_yaml().map(|mut yaml| {
            if yaml.ends_with('\n') {
                yaml.pop();
            }
            yaml
        }),
    };
    result.map_err(|err| LogError::invalid_message_caused_by("could not serialize message", err))
}

/// Serializes `value` into compact JSON, refusing non-finite floats.
pub(crate) fn json_string<T: Serialize + ?Sized>(value: &T) -> Result<String, BoxError> {
    value.serialize(FiniteGuard)?;
    Ok(serde_json::to_string(value)?)
}

/// Error raised by [`FiniteGuard`].
#[derive(Debug, Error)]
pub enum GuardError {
    /// A float was NaN or infinite.
    #[error("unsupported value: {0}")]
    NonFinite(f64),

    /// The value's own `Serialize` implementation failed.
    #[error("{0}")]
    Custom(String),
}

impl ser::Error for GuardError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

/// A serializer that produces nothing and only checks that every float is
/// finite.
#[derive(Clone, Copy)]
struct FiniteGuard;

type Checked = Result<(), GuardError>;

fn finite(value: f64) -> Checked {
    if value.is_finite() {
        Ok(())
    } else {
        Err(GuardError::NonFinite(value))
    }
}

impl ser::Serializer for FiniteGuard {
    type Ok = ();
    type Error = GuardError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Checked {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Checked {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Checked {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Checked {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Checked {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Checked {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Checked {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Checked {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Checked {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Checked {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Checked {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Checked {
        finite(f64::from(v))
    }

    fn serialize_f64(self, v: f64) -> Checked {
        finite(v)
    }

    fn serialize_char(self, _: char) -> Checked {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Checked {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Checked {
        Ok(())
    }

    fn serialize_none(self) -> Checked {
        Ok(())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Checked {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Checked {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_unit_variant(self, _: &'static str, _: u32, _: &'static str) -> Checked {
        Ok(())
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Checked {
        value.serialize(self)
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple(self, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, GuardError> {
        Ok(self)
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, GuardError> {
        Ok(self)
    }
}

impl ser::SerializeSeq for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTuple for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleStruct for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeTupleVariant for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeMap for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Checked {
        key.serialize(*self)
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStruct for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}

impl ser::SerializeStructVariant for FiniteGuard {
    type Ok = ();
    type Error = GuardError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, _: &'static str, value: &T) -> Checked {
        value.serialize(*self)
    }

    fn end(self) -> Checked {
        Ok(())
    }
}
