//! The logging entry points.

use crate::coerce::coerce;
use crate::error::LogError;
use crate::frame;
use crate::level::IntoLevel;
use crate::message::Message;
use std::io::{self, Write};

/// Coerces and frames a message without writing it.
///
/// # Errors
///
/// Returns [`LogError::InvalidLevel`] for unknown levels, and otherwise the
/// coercion error for the level's payload shape.
///
/// # Example
///
/// ```
/// use corelog::{format, Level};
///
/// assert_eq!(format(Level::Stdout, "Hello world").unwrap(), "1::Hello world\n");
/// assert!(format(255u8, "Hello world").is_err());
/// ```
pub fn format<'a, L, M>(level: L, message: M) -> Result<String, LogError>
where
    L: IntoLevel,
    M: Into<Message<'a>>,
{
    let level = level.into_level()?;
    let payload = coerce(level, &message.into())?;
    Ok(frame::frame(level, &payload))
}

/// Logs a message to `writer`.
///
/// The record is fully built before anything is written, so a failed call
/// leaves the writer untouched.
///
/// # Errors
///
/// See [`format`]. Writer failures are returned as [`LogError::Io`].
pub fn log_to<'a, W, L, M>(writer: &mut W, level: L, message: M) -> Result<(), LogError>
where
    W: Write + ?Sized,
    L: IntoLevel,
    M: Into<Message<'a>>,
{
    let level = level.into_level()?;
    let payload = coerce(level, &message.into())?;
    frame::write_record(writer, level, &payload)?;

    tracing::trace!(
        level = level.as_u8(),
        name = level.name(),
        multiline = frame::is_multiline(&payload),
        "wrote log record"
    );
    Ok(())
}

/// Logs a message to the process' standard output.
///
/// # Errors
///
/// See [`log_to`].
///
/// # Example
///
/// ```
/// use corelog::{log, Level};
///
/// log(Level::Stdout, "Hello world").unwrap();
/// ```
pub fn log<'a, L, M>(level: L, message: M) -> Result<(), LogError>
where
    L: IntoLevel,
    M: Into<Message<'a>>,
{
    log_to(&mut io::stdout().lock(), level, message)
}

/// A logger that owns its sink.
///
/// Callers sharing one sink between threads must serialize access to the
/// logger themselves.
#[derive(Debug)]
pub struct Logger<W> {
    writer: W,
}

impl Logger<io::Stdout> {
    /// Creates a logger writing to the process' standard output.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Logger<W> {
    /// Creates a logger writing to `writer`.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Logs a message to the sink.
    ///
    /// # Errors
    ///
    /// See [`log_to`].
    pub fn log<'a, L, M>(&mut self, level: L, message: M) -> Result<(), LogError>
    where
        L: IntoLevel,
        M: Into<Message<'a>>,
    {
        log_to(&mut self.writer, level, message)
    }

    /// Returns a reference to the sink.
    pub const fn get_ref(&self) -> &W {
        &self.writer
    }

    /// Consumes the logger, returning the sink.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl Default for Logger<io::Stdout> {
    fn default() -> Self {
        Self::stdout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::level::Level;
    use crate::models::{Aggregation, Statistics};

    /// A writer that always fails.
    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_format_levels() {
        assert_eq!(format(Level::Stdout, "Hello world").unwrap(), "1::Hello world\n");
        assert_eq!(format(2u8, "Hello\nworld").unwrap(), "2:::\nHello\nworld\n:::\n");
    }

    #[test]
    fn test_log_to_writes_one_record() {
        let mut buf = Vec::new();
        log_to(&mut buf, Level::Stdout, "Hello world").unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "1::Hello world\n");
    }

    #[test]
    fn test_log_to_invalid_level_writes_nothing() {
        let mut buf = Vec::new();
        let err = log_to(&mut buf, 255u8, "Hello world").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidLevel);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_log_to_nil_message() {
        let mut buf = Vec::new();
        let none: Option<&str> = None;
        let err = log_to(&mut buf, Level::Stdout, none).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NilMessage);

        let err = log_to(&mut buf, 1u8, "").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NilMessage);
        assert!(buf.is_empty());
    }

    #[test]
    fn test_log_to_sink_failure() {
        let err = log_to(&mut ClosedPipe, Level::Stdout, "Hello").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_logger_owns_sink() {
        let stats = Statistics::new("somekey", 123.456, Aggregation::Average).with_tag("foo", "bar");

        let mut logger = Logger::new(Vec::new());
        logger.log(Level::Stdout, "first").unwrap();
        logger.log(Level::Statistics, &stats).unwrap();
        assert!(logger.log(Level::Toml, "a = 1").is_err());

        let out = String::from_utf8(logger.into_inner()).unwrap();
        assert_eq!(out, "1::first\n10::somekey:123.456|A|foo=bar\n");
    }

    #[test]
    fn test_log_stdout() {
        assert!(log(Level::Stdout, "Hello world").is_ok());
        assert!(log(Level::Stderr, "Hello world").is_ok());
        assert_eq!(log(255u8, "Hello world").unwrap_err().kind(), ErrorKind::InvalidLevel);
    }
}
