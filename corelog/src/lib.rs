//! Corelog Library
//!
//! This crate formats messages for the 0-Core log monitor. A message is
//! coerced into the payload shape its level requires, framed into a single
//! wire record and written to a sink.
//!
//! # Modules
//!
//! - [`level`] - Levels and the payload shape each one accepts
//! - [`message`] - The message model built at the call boundary
//! - [`models`] - Statistics records
//! - [`coerce`] - Level dispatch and payload coercion
//! - [`frame`] - Single-line and multi-line framing
//!
//! # Wire format
//!
//! ```text
//! 1::Hello world
//! 10::somekey:123.456|A|foo=bar
//! 1:::
//! Hello
//! world
//! :::
//! ```
//!
//! # Example
//!
//! ```
//! use corelog::models::{Aggregation, Statistics};
//! use corelog::{log_to, Level, Message};
//!
//! let mut out = Vec::new();
//! log_to(&mut out, Level::Stdout, "Hello world").unwrap();
//!
//! let stats = Statistics::new("somekey", 123.456, Aggregation::Average)
//!     .with_tag("foo", "bar");
//! log_to(&mut out, Level::Statistics, &stats).unwrap();
//!
//! let result = serde_json::json!({"status": "ok"});
//! log_to(&mut out, Level::Json, Message::structured(&result)).unwrap();
//!
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "1::Hello world\n10::somekey:123.456|A|foo=bar\n20::{\"status\":\"ok\"}\n"
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod coerce;
pub mod error;
pub mod frame;
pub mod level;
mod logger;
pub mod message;
pub mod models;

pub use error::{BoxError, ErrorKind, LogError};
pub use level::{IntoLevel, Level, Shape, Syntax};
pub use logger::{format, log, log_to, Logger};
pub use message::{MarshalText, Message, StructuredValue, TextAdapter};

/// Re-export common dependencies for convenience.
pub use serde;
pub use serde_json;
