use std::io;

use thiserror::Error;

use crate::types::{PathString, SourceId};

/// Error type for label-table, bundle, configuration, and aggregation failures.
///
/// Missing or malformed content files never surface here; sources absorb them
/// and keep streaming. Only failures that would make a rate wrong are raised.
#[derive(Debug, Error)]
pub enum PotemkinError {
    /// A label table or config the source needs is absent.
    #[error("data source '{source_id}' is unavailable: {reason}")]
    SourceUnavailable {
        /// Source that failed to open.
        source_id: SourceId,
        /// Human-readable cause.
        reason: String,
    },
    /// A label table lacks a required column.
    #[error("label table for '{source_id}' has no '{column}' column")]
    MissingColumn {
        /// Source owning the table.
        source_id: SourceId,
        /// Missing column name.
        column: String,
    },
    /// A correctness value matched none of the recognized encodings.
    #[error("data source '{source_id}' has unrecognized correctness value {value} at {location}")]
    UnrecognizedCorrectness {
        /// Source that read the value.
        source_id: SourceId,
        /// `table:line` or bundle path.
        location: PathString,
        /// Offending value as rendered by `RawCorrectness`.
        value: String,
    },
    /// CSV syntax or decoding failure.
    #[error("label table error: {0}")]
    Table(#[from] csv::Error),
    /// JSON decoding failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] io::Error),
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Configuration(String),
    /// A subject model call failed.
    #[error("subject model failed: {0}")]
    Subject(String),
}
