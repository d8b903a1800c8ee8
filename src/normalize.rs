//! Record normalization shared by every task source.
//!
//! Sources hand over raw field values; this module trims the concept,
//! canonicalizes the model, derives the domain, and coerces the many
//! correctness encodings into [`Correctness`].

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::config::Catalog;
use crate::data::{Correctness, Record, Task};
use crate::errors::PotemkinError;
use crate::types::{ExtraFields, ModelName, PathString, SourceId};

/// A correctness value as found at the source, before normalization.
#[derive(Clone, Debug, PartialEq)]
pub enum RawCorrectness {
    /// Boolean flag (`true`).
    Flag(bool),
    /// Numeric flag (`1.0`, `0`).
    Number(f64),
    /// Text flag (`"yes"`, `"False"`, `"1.0"`).
    Text(String),
    /// List whose first element carries the outcome (`[true, false]`).
    List(Vec<RawCorrectness>),
    /// Any other JSON shape (objects, nulls nested in lists).
    Other(String),
}

impl RawCorrectness {
    /// Convert a JSON value. Returns `None` for `null`, which callers treat as absent.
    pub fn from_json(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => return None,
            Value::Bool(flag) => RawCorrectness::Flag(*flag),
            Value::Number(number) => match number.as_f64() {
                Some(number) => RawCorrectness::Number(number),
                None => RawCorrectness::Other(number.to_string()),
            },
            Value::String(text) => RawCorrectness::Text(text.clone()),
            Value::Array(items) => RawCorrectness::List(
                items
                    .iter()
                    .map(|item| {
                        RawCorrectness::from_json(item)
                            .unwrap_or_else(|| RawCorrectness::Other(item.to_string()))
                    })
                    .collect(),
            ),
            Value::Object(_) => RawCorrectness::Other(value.to_string()),
        })
    }
}

impl fmt::Display for RawCorrectness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCorrectness::Flag(flag) => write!(f, "{flag}"),
            RawCorrectness::Number(number) => write!(f, "{number}"),
            RawCorrectness::Text(text) => write!(f, "{text:?}"),
            RawCorrectness::List(items) => {
                f.write_str("[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            RawCorrectness::Other(raw) => f.write_str(raw),
        }
    }
}

/// Normalize a raw correctness value.
///
/// Returns `None` when the value matches none of the recognized shapes; it is
/// never silently read as `No`.
pub fn normalize_correct(raw: &RawCorrectness) -> Option<Correctness> {
    match raw {
        RawCorrectness::Flag(flag) => Some((*flag).into()),
        RawCorrectness::Number(number) => correctness_from_number(*number),
        RawCorrectness::Text(text) => correctness_from_text(text),
        RawCorrectness::List(items) => match items.first() {
            Some(RawCorrectness::Flag(flag)) => Some((*flag).into()),
            _ => None,
        },
        RawCorrectness::Other(_) => None,
    }
}

fn correctness_from_number(number: f64) -> Option<Correctness> {
    if number == 1.0 {
        Some(Correctness::Yes)
    } else if number == 0.0 {
        Some(Correctness::No)
    } else {
        None
    }
}

fn correctness_from_text(text: &str) -> Option<Correctness> {
    let lowered = text.trim().to_ascii_lowercase();
    match lowered.as_str() {
        "yes" | "true" => Some(Correctness::Yes),
        "no" | "false" => Some(Correctness::No),
        other => other
            .parse::<f64>()
            .ok()
            .and_then(correctness_from_number),
    }
}

/// Per-record fields gathered by a source before normalization.
#[derive(Clone, Debug)]
pub struct RecordFields {
    /// Concept as read; trimmed by [`RecordNormalizer::build`].
    pub concept: String,
    /// Already canonical model name, see [`RecordNormalizer::canonical_model`].
    pub model: ModelName,
    /// Normalized outcome.
    pub correct: Correctness,
    /// Path or table the record was read from.
    pub source_file: PathString,
    /// Free-text payload, if any.
    pub content: Option<String>,
    /// Source-specific fields.
    pub extra: ExtraFields,
}

/// Per-source normalizer bound to a task and an injected catalog.
#[derive(Clone, Debug)]
pub struct RecordNormalizer {
    source_id: SourceId,
    task: Task,
    catalog: Arc<Catalog>,
}

impl RecordNormalizer {
    /// Normalizer tagging records with `task` and reporting errors as `source_id`.
    pub fn new(source_id: impl Into<SourceId>, task: Task, catalog: Arc<Catalog>) -> Self {
        Self {
            source_id: source_id.into(),
            task,
            catalog,
        }
    }

    /// Source id used in errors and logs.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Injected label catalog.
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Canonical name of a raw model identifier.
    ///
    /// Sources call this exactly once per record; [`RecordNormalizer::build`]
    /// takes the result as is.
    pub fn canonical_model(&self, raw_model: &str) -> ModelName {
        self.catalog.models.canonicalize(raw_model)
    }

    /// Normalize a correctness value, escalating unrecognized encodings.
    ///
    /// `location` names the row or file the value came from.
    pub fn correct(
        &self,
        raw: &RawCorrectness,
        location: impl Into<PathString>,
    ) -> Result<Correctness, PotemkinError> {
        normalize_correct(raw).ok_or_else(|| PotemkinError::UnrecognizedCorrectness {
            source_id: self.source_id.clone(),
            location: location.into(),
            value: raw.to_string(),
        })
    }

    /// Build the final record: trimmed concept and derived domain. The model
    /// in `fields` is stored unchanged.
    pub fn build(&self, fields: RecordFields) -> Record {
        let concept = fields.concept.trim().to_string();
        Record {
            domain: self.catalog.domains.classify(&concept),
            model: fields.model,
            concept,
            task: self.task,
            correct: fields.correct,
            source_file: fields.source_file,
            content: fields.content,
            extra: fields.extra,
        }
    }
}
