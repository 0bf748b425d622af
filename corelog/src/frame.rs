//! Line framing for the 0-Core wire format.
//!
//! A single-line payload is written as `LEVEL::payload\n`. A payload that
//! contains a line break is written as a delimited block:
//!
//! ```text
//! LEVEL:::
//! payload
//! :::
//! ```

use crate::level::Level;
use std::io::{self, Write};

const MULTILINE_OPEN: &str = ":::\n";
const MULTILINE_CLOSE: &str = "\n:::\n";
const SINGLE_LINE_SEPARATOR: &str = "::";

/// Returns `true` if `payload` contains a line break (`\n` or `\r`).
#[must_use]
pub fn is_multiline(payload: &str) -> bool {
    payload.contains(['\n', '\r'])
}

/// Frames `payload` into a complete wire record, trailing newline included.
///
/// # Example
///
/// ```
/// use corelog::{frame, Level};
///
/// assert_eq!(frame::frame(Level::Stdout, "Hello world"), "1::Hello world\n");
/// assert_eq!(frame::frame(Level::Stdout, "Hello\nworld"), "1:::\nHello\nworld\n:::\n");
/// ```
#[must_use]
pub fn frame(level: Level, payload: &str) -> String {
    if is_multiline(payload) {
        format!("{level}{MULTILINE_OPEN}{payload}{MULTILINE_CLOSE}")
    } else {
        format!("{level}{SINGLE_LINE_SEPARATOR}{payload}\n")
    }
}

/// Frames `payload` and writes the record to `writer` in one `write_all`.
///
/// # Errors
///
/// Returns the error of the underlying writer unchanged.
pub fn write_record<W: Write + ?Sized>(
    writer: &mut W,
    level: Level,
    payload: &str,
) -> io::Result<()> {
    let record = frame(level, payload);
    writer.write_all(record.as_bytes())?;
    writer.flush()
}

/// Splits one framed record back into its raw level and payload.
///
/// Returns `None` if `record` is not exactly one well formed record.
///
/// # Example
///
/// ```
/// use corelog::frame;
///
/// assert_eq!(frame::parse("10::somekey:1|A\n"), Some((10, "somekey:1|A")));
/// assert_eq!(frame::parse("20:::\n{}\n}\n:::\n"), Some((20, "{}\n}")));
/// assert_eq!(frame::parse("garbage"), None);
/// ```
#[must_use]
pub fn parse(record: &str) -> Option<(u8, &str)> {
    let digits = record.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let level = record[..digits].parse().ok()?;
    let rest = &record[digits..];

    if let Some(block) = rest.strip_prefix(MULTILINE_OPEN) {
        if let Some(payload) = block.strip_suffix(MULTILINE_CLOSE) {
            if is_multiline(payload) {
                return Some((level, payload));
            }
        }
    }

    let payload = rest.strip_prefix(SINGLE_LINE_SEPARATOR)?.strip_suffix('\n')?;
    if is_multiline(payload) {
        return None;
    }
    Some((level, payload))
}
