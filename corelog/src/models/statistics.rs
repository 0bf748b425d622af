//! Statistics record model.
//!
//! A [`Statistics`] record feeds the 0-Core statistics monitor. It is logged
//! at [`Level::Statistics`](crate::Level::Statistics) as
//! `key:value|aggregation[|tag=value,...]`.

use crate::error::LogError;
use crate::message::MarshalText;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use validator::Validate;

/// How the monitor combines repeated values for the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Aggregation {
    /// Values are averaged (`A`).
    Average,
    /// Values are differentiated over time (`D`).
    Differentiate,
}

impl Aggregation {
    /// Returns the single letter wire code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Average => "A",
            Self::Differentiate => "D",
        }
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Aggregation {
    type Err = LogError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        match code {
            "A" => Ok(Self::Average),
            "D" => Ok(Self::Differentiate),
            other => Err(LogError::InvalidAggregationType(other.to_string())),
        }
    }
}

impl Serialize for Aggregation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Aggregation {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

/// A [`MarshalText`] value that can also be shown with `Debug` when
/// marshaling fails.
pub trait TagMarshal: MarshalText + fmt::Debug + Send + Sync {}

impl<T: MarshalText + fmt::Debug + Send + Sync> TagMarshal for T {}

/// The value of a statistics tag.
///
/// Rendering tries, in order: plain text, `Display`, marshaled text (failures
/// fall through), bytes decoded as UTF-8 and finally the `Debug` form.
#[derive(Clone)]
pub enum TagValue {
    /// Plain text, used as is.
    Text(String),
    /// A value rendered through `Display`.
    Display(Arc<dyn fmt::Display + Send + Sync>),
    /// A value rendered through [`MarshalText`].
    Marshal(Arc<dyn TagMarshal>),
    /// Raw bytes, decoded lossily.
    Bytes(Vec<u8>),
    /// Anything else, rendered through `Debug`.
    Debug(Arc<dyn fmt::Debug + Send + Sync>),
}

impl TagValue {
    /// Wraps a value rendered through `Display`.
    pub fn display<T: fmt::Display + Send + Sync + 'static>(value: T) -> Self {
        Self::Display(Arc::new(value))
    }

    /// Wraps a value rendered through [`MarshalText`].
    pub fn marshal<T: TagMarshal + 'static>(value: T) -> Self {
        Self::Marshal(Arc::new(value))
    }

    /// Wraps a value rendered through `Debug`.
    pub fn debug<T: fmt::Debug + Send + Sync + 'static>(value: T) -> Self {
        Self::Debug(Arc::new(value))
    }

    /// Renders the value into the text used on the wire.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Display(value) => value.to_string(),
            Self::Marshal(value) => value
                .marshal_text()
                .ok()
                .and_then(|bytes| String::from_utf8(bytes).ok())
                .unwrap_or_else(|| format!("{value:?}")),
            Self::Bytes(bytes) => String::from_utf8_lossy(bytes).into_owned(),
            Self::Debug(value) => format!("{value:?}"),
        }
    }

    fn variant(&self) -> &'static str {
        match self {
            Self::Text(_) => "Text",
            Self::Display(_) => "Display",
            Self::Marshal(_) => "Marshal",
            Self::Bytes(_) => "Bytes",
            Self::Debug(_) => "Debug",
        }
    }
}

impl fmt::Debug for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(self.variant()).field(&self.render()).finish()
    }
}

impl Serialize for TagValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.render())
    }
}

impl From<&str> for TagValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for TagValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

impl From<&[u8]> for TagValue {
    fn from(bytes: &[u8]) -> Self {
        Self::Bytes(bytes.to_vec())
    }
}

macro_rules! tag_value_from_display {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for TagValue {
                fn from(value: $ty) -> Self {
                    Self::display(value)
                }
            }
        )*
    };
}

tag_value_from_display!(bool, char, i32, i64, u32, u64, usize, f32, f64);

impl From<serde_json::Value> for TagValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::String(text) => Self::Text(text),
            other => Self::display(other),
        }
    }
}

/// Tags attached to a statistics record. Iteration order is unspecified.
pub type Tags = HashMap<String, TagValue>;

/// Renders tags as comma separated `key=value` pairs.
///
/// Returns an empty string for no tags.
#[must_use]
pub fn render_tags(tags: &Tags) -> String {
    tags.iter()
        .map(|(key, value)| format!("{key}={}", value.render()))
        .collect::<Vec<_>>()
        .join(",")
}

/// A statistics record for the 0-Core statistics monitor.
///
/// # Example
///
/// ```
/// use corelog::models::{Aggregation, Statistics};
///
/// let stats = Statistics::new("somekey", 123.456, Aggregation::Average)
///     .with_tag("foo", "bar");
///
/// assert_eq!(stats.payload().unwrap(), "somekey:123.456|A|foo=bar");
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(try_from = "RawStatistics")]
pub struct Statistics {
    /// The statistics key. Must not be empty.
    #[validate(length(min = 1, message = "Statistics key cannot be empty"))]
    pub key: String,

    /// The measured value.
    pub value: f64,

    /// How repeated values are combined.
    pub aggregation: Aggregation,

    /// Free-form annotations.
    pub tags: Tags,
}

impl Statistics {
    /// Creates a record without tags.
    #[must_use]
    pub fn new(key: impl Into<String>, value: f64, aggregation: Aggregation) -> Self {
        Self {
            key: key.into(),
            value,
            aggregation,
            tags: Tags::new(),
        }
    }

    /// Creates a record from a raw aggregation code.
    ///
    /// The key is checked before the aggregation code.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::NilStatisticsKey`] for an empty key and
    /// [`LogError::InvalidAggregationType`] for a code other than `A` or `D`.
    pub fn from_parts(
        key: impl Into<String>,
        value: f64,
        aggregation: &str,
        tags: Tags,
    ) -> Result<Self, LogError> {
        let key = key.into();
        if key.is_empty() {
            return Err(LogError::NilStatisticsKey);
        }
        Ok(Self {
            key,
            value,
            aggregation: aggregation.parse()?,
            tags,
        })
    }

    /// Adds a tag to the record.
    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<TagValue>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    /// Validates the record.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::NilStatisticsKey`] if the key is empty.
    pub fn validate_record(&self) -> Result<(), LogError> {
        if self.key.is_empty() {
            return Err(LogError::NilStatisticsKey);
        }
        self.validate().map_err(|errors| {
            if errors.field_errors().contains_key("key") {
                LogError::NilStatisticsKey
            } else {
                LogError::invalid_message_caused_by("statistics record is invalid", errors)
            }
        })
    }

    /// Validates the record and renders the statistics payload.
    ///
    /// The value is written with the shortest representation that parses
    /// back to the same `f64`.
    ///
    /// # Errors
    ///
    /// See [`Statistics::validate_record`].
    pub fn payload(&self) -> Result<String, LogError> {
        self.validate_record()?;

        let mut payload = format!("{}:{}|{}", self.key, self.value, self.aggregation);
        if !self.tags.is_empty() {
            payload.push('|');
            payload.push_str(&render_tags(&self.tags));
        }
        Ok(payload)
    }
}

impl Serialize for Statistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(4))?;
        map.serialize_entry("key", &self.key)?;
        map.serialize_entry("value", &self.value)?;
        map.serialize_entry("aggregation", &self.aggregation)?;
        map.serialize_entry("tags", &self.tags)?;
        map.end()
    }
}

/// Wire shape of a statistics record before validation.
#[derive(Deserialize)]
struct RawStatistics {
    key: String,
    value: f64,
    aggregation: String,
    #[serde(default)]
    tags: HashMap<String, serde_json::Value>,
}

impl TryFrom<RawStatistics> for Statistics {
    type Error = LogError;

    fn try_from(raw: RawStatistics) -> Result<Self, Self::Error> {
        let tags = raw
            .tags
            .into_iter()
            .map(|(key, value)| (key, TagValue::from(value)))
            .collect();
        Self::from_parts(raw.key, raw.value, &raw.aggregation, tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, ErrorKind};
    use serde_json::json;

    #[derive(Debug)]
    struct Version(u8, u8);

    impl MarshalText for Version {
        fn marshal_text(&self) -> Result<Vec<u8>, BoxError> {
            Ok(format!("v{}.{}", self.0, self.1).into_bytes())
        }
    }

    #[derive(Debug)]
    struct Broken;

    impl MarshalText for Broken {
        fn marshal_text(&self) -> Result<Vec<u8>, BoxError> {
            Err("an expected error".into())
        }
    }

    #[test]
    fn test_payload_full() {
        let stats = Statistics::new("somekey", 123.456, Aggregation::Average).with_tag("foo", "bar");
        assert_eq!(stats.payload().unwrap(), "somekey:123.456|A|foo=bar");
    }

    #[test]
    fn test_payload_without_tags() {
        let stats = Statistics::new("somekey", 123.456, Aggregation::Differentiate);
        assert_eq!(stats.payload().unwrap(), "somekey:123.456|D");
    }

    #[test]
    fn test_payload_keeps_precision() {
        let stats = Statistics::new("somekey", 1.123_400_000_1, Aggregation::Average);
        assert_eq!(stats.payload().unwrap(), "somekey:1.1234000001|A");
    }

    #[test]
    fn test_payload_integral_value() {
        let stats = Statistics::new("count", 42.0, Aggregation::Average);
        assert_eq!(stats.payload().unwrap(), "count:42|A");
    }

    #[test]
    fn test_payload_multiple_tags_any_order() {
        let stats = Statistics::new("somekey", 1.0, Aggregation::Average)
            .with_tag("foo", "bar")
            .with_tag("hello", "world");
        let payload = stats.payload().unwrap();

        assert!(
            payload == "somekey:1|A|foo=bar,hello=world"
                || payload == "somekey:1|A|hello=world,foo=bar",
            "unexpected payload: {payload}"
        );
        assert!(!payload.ends_with(','));
    }

    #[test]
    fn test_empty_key() {
        let stats = Statistics::new("", 1.0, Aggregation::Average);
        assert_eq!(stats.validate_record().unwrap_err().kind(), ErrorKind::NilStatisticsKey);
        assert_eq!(stats.payload().unwrap_err().kind(), ErrorKind::NilStatisticsKey);
    }

    #[test]
    fn test_from_parts_validation_order() {
        let err = Statistics::from_parts("", 1.0, "X", Tags::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NilStatisticsKey);

        let err = Statistics::from_parts("key", 1.0, "X", Tags::new()).unwrap_err();
        assert!(matches!(err, LogError::InvalidAggregationType(code) if code == "X"));

        let stats = Statistics::from_parts("key", 1.0, "D", Tags::new()).unwrap();
        assert_eq!(stats.aggregation, Aggregation::Differentiate);
    }

    #[test]
    fn test_aggregation_codes() {
        assert_eq!(Aggregation::Average.to_string(), "A");
        assert_eq!(Aggregation::Differentiate.to_string(), "D");
        assert_eq!("A".parse::<Aggregation>().unwrap(), Aggregation::Average);
        assert_eq!(
            "a".parse::<Aggregation>().unwrap_err().kind(),
            ErrorKind::InvalidAggregationType
        );
    }

    #[test]
    fn test_tag_value_render_chain() {
        assert_eq!(TagValue::from("text").render(), "text");
        assert_eq!(TagValue::from(12_i64).render(), "12");
        assert_eq!(TagValue::from(0.25_f64).render(), "0.25");
        assert_eq!(TagValue::from(true).render(), "true");
        assert_eq!(TagValue::marshal(Version(1, 2)).render(), "v1.2");
        assert_eq!(TagValue::marshal(Broken).render(), "Broken");
        assert_eq!(TagValue::from(b"bytes".to_vec()).render(), "bytes");
        assert_eq!(TagValue::from(&[0xff_u8, b'a'][..]).render(), "\u{fffd}a");
        assert_eq!(TagValue::debug(vec![1, 2]).render(), "[1, 2]");
    }

    #[test]
    fn test_tag_value_debug() {
        assert_eq!(format!("{:?}", TagValue::from("x")), r#"Text("x")"#);
    }

    #[test]
    fn test_render_tags_empty() {
        assert_eq!(render_tags(&Tags::new()), "");
    }

    #[test]
    fn test_statistics_deserialization() {
        let stats: Statistics = serde_json::from_value(json!({
            "key": "cpu.load",
            "value": 0.75,
            "aggregation": "A",
            "tags": {"host": "node-1", "core": 3}
        }))
        .unwrap();

        assert_eq!(stats.key, "cpu.load");
        assert_eq!(stats.aggregation, Aggregation::Average);
        assert_eq!(stats.tags["host"].render(), "node-1");
        assert_eq!(stats.tags["core"].render(), "3");
    }

    #[test]
    fn test_statistics_deserialization_rejects_invalid() {
        let result = serde_json::from_value::<Statistics>(json!({
            "key": "",
            "value": 1.0,
            "aggregation": "Z"
        }));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("statistics key was missing"));

        let result = serde_json::from_value::<Statistics>(json!({
            "key": "k",
            "value": 1.0,
            "aggregation": "Z"
        }));
        assert!(result.unwrap_err().to_string().contains("invalid aggregation type"));
    }

    #[test]
    fn test_statistics_serialization() {
        let stats = Statistics::new("k", 2.5, Aggregation::Differentiate).with_tag("t", 1_u32);
        let value = serde_json::to_value(&stats).unwrap();
        assert_eq!(
            value,
            json!({"key": "k", "value": 2.5, "aggregation": "D", "tags": {"t": "1"}})
        );
    }
}
