//! Data models for payloads with their own validation rules.
//!
//! Currently this is the statistics record consumed by the 0-Core statistics
//! monitor.

pub mod statistics;

pub use statistics::{render_tags, Aggregation, Statistics, TagMarshal, TagValue, Tags};
