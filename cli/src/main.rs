//! Corelog CLI
//!
//! Command-line host that emits 0-Core log monitor records on stdout.
//! Diagnostics go to stderr so they never mix with the records.
//!
//! # Usage
//!
//! ```bash
//! corelog text "Hello world"
//! echo "Hello world" | corelog text --stderr
//! corelog stat --key cpu.load --value 0.75 --aggregation A --tag host=node-1
//! corelog json result.json
//! corelog yaml < result.json
//! corelog raw --level 2 "Hello world"
//! ```

#![deny(unsafe_code)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use corelog::models::{Statistics, TagValue, Tags};
use corelog::{log_to, Level, Message};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Corelog CLI - emit records for the 0-Core log monitor
#[derive(Parser)]
#[command(name = "corelog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Filter for diagnostics written to stderr, used when `RUST_LOG` is unset
    #[arg(long, env = "CORELOG_LOG_FILTER", default_value = "warn")]
    log_filter: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit plain text at the stdout (1) or stderr (2) level
    Text {
        /// Log at the stderr level instead of the stdout level
        #[arg(long)]
        stderr: bool,

        /// Message to emit, read from stdin when omitted
        message: Option<String>,
    },

    /// Emit a statistics record (level 10)
    Stat {
        /// Statistics key
        #[arg(short, long)]
        key: String,

        /// Measured value
        #[arg(short, long, allow_negative_numbers = true)]
        value: f64,

        /// Aggregation code: A (average) or D (differentiate)
        #[arg(short, long, default_value = "A")]
        aggregation: String,

        /// Tag as key=value, may be repeated
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Emit a JSON document (level 20)
    Json {
        /// File holding the document, stdin when omitted
        file: Option<PathBuf>,
    },

    /// Emit a JSON document converted to YAML (level 21)
    Yaml {
        /// File holding the document, stdin when omitted
        file: Option<PathBuf>,
    },

    /// Emit text at an arbitrary numeric level
    Raw {
        /// Numeric wire level
        #[arg(short, long)]
        level: u8,

        /// Message to emit
        message: String,
    },
}

/// Parses a `key=value` tag argument.
fn parse_tag(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid tag '{arg}', expected key=value")),
    }
}

/// Reads the whole input from `file`, or from stdin when `None`.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("failed to read stdin")?;
            Ok(input)
        }
    }
}

/// Emits the record for `command` to `out`.
fn run<W: Write>(command: Commands, out: &mut W) -> Result<()> {
    match command {
        Commands::Text { stderr, message } => {
            let level = if stderr { Level::Stderr } else { Level::Stdout };
            let text = match message {
                Some(text) => text,
                None => {
                    let mut input = read_input(None)?;
                    if input.ends_with('\n') {
                        input.pop();
                    }
                    input
                }
            };
            tracing::debug!(level = level.as_u8(), "emitting text record");
            log_to(out, level, &text).context("failed to log text message")?;
        }
        Commands::Stat {
            key,
            value,
            aggregation,
            tags,
        } => {
            let tags: Tags = tags
                .into_iter()
                .map(|(key, value)| (key, TagValue::from(value)))
                .collect();
            let stats = Statistics::from_parts(key, value, &aggregation, tags)
                .context("invalid statistics record")?;
            tracing::debug!(key = %stats.key, "emitting statistics record");
            log_to(out, Level::Statistics, &stats).context("failed to log statistics")?;
        }
        Commands::Json { file } => emit_document(out, Level::Json, file.as_deref())?,
        Commands::Yaml { file } => emit_document(out, Level::Yaml, file.as_deref())?,
        Commands::Raw { level, message } => {
            tracing::debug!(level, "emitting raw record");
            log_to(out, level, &message).context("failed to log message")?;
        }
    }
    Ok(())
}

fn emit_document<W: Write>(out: &mut W, level: Level, file: Option<&Path>) -> Result<()> {
    let input = read_input(file)?;
    let document: serde_json::Value =
        serde_json::from_str(&input).context("input is not a JSON document")?;
    tracing::debug!(level = level.as_u8(), "emitting structured record");
    log_to(out, level, Message::structured(&document))
        .with_context(|| format!("failed to log {} document", level.name()))
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(&cli.log_filter))
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    run(cli.command, &mut io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(args: &[&str]) -> Result<String> {
        let cli = Cli::try_parse_from(args)?;
        let mut out = Vec::new();
        run(cli.command, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_cli_requires_command() {
        let cli = Cli::try_parse_from(["corelog"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_text_command() {
        let cli = Cli::try_parse_from(["corelog", "text", "--stderr", "hi"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Text { stderr: true, message: Some(ref m) } if m == "hi"
        ));
        assert_eq!(cli.log_filter, "warn");
    }

    #[test]
    fn test_cli_stat_command() {
        let cli = Cli::try_parse_from([
            "corelog", "stat", "-k", "cpu", "-v", "-1.5", "-t", "host=a", "--tag", "core=2",
        ])
        .unwrap();
        match cli.command {
            Commands::Stat {
                key,
                value,
                aggregation,
                tags,
            } => {
                assert_eq!(key, "cpu");
                assert!((value + 1.5).abs() < f64::EPSILON);
                assert_eq!(aggregation, "A");
                assert_eq!(tags.len(), 2);
            }
            _ => panic!("expected stat command"),
        }
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("foo=bar").unwrap(),
            ("foo".to_string(), "bar".to_string())
        );
        assert_eq!(
            parse_tag("eq=a=b").unwrap(),
            ("eq".to_string(), "a=b".to_string())
        );
        assert!(parse_tag("novalue").is_err());
        assert!(parse_tag("=value").is_err());
    }

    #[test]
    fn test_run_text() {
        let out = run_to_string(&["corelog", "text", "Hello world"]).unwrap();
        assert_eq!(out, "1::Hello world\n");

        let out = run_to_string(&["corelog", "text", "--stderr", "Hello\nworld"]).unwrap();
        assert_eq!(out, "2:::\nHello\nworld\n:::\n");
    }

    #[test]
    fn test_run_text_empty_fails() {
        assert!(run_to_string(&["corelog", "text", ""]).is_err());
    }

    #[test]
    fn test_run_stat() {
        let out = run_to_string(&[
            "corelog", "stat", "-k", "somekey", "-v", "123.456", "-t", "foo=bar",
        ])
        .unwrap();
        assert_eq!(out, "10::somekey:123.456|A|foo=bar\n");
    }

    #[test]
    fn test_run_stat_invalid_aggregation() {
        let err = run_to_string(&["corelog", "stat", "-k", "k", "-v", "1", "-a", "X"]).unwrap_err();
        let cause = err.downcast_ref::<corelog::LogError>().unwrap();
        assert_eq!(cause.kind(), corelog::ErrorKind::InvalidAggregationType);
    }

    #[test]
    fn test_run_raw_invalid_level() {
        let err = run_to_string(&["corelog", "raw", "-l", "255", "hi"]).unwrap_err();
        let cause = err.downcast_ref::<corelog::LogError>().unwrap();
        assert_eq!(cause.kind(), corelog::ErrorKind::InvalidLevel);
    }

    #[test]
    fn test_run_raw_valid_level() {
        let out = run_to_string(&["corelog", "raw", "-l", "2", "hi"]).unwrap();
        assert_eq!(out, "2::hi\n");
    }
}
