//! Self-describing JSON inference bundles written by generate/edit runs.

use std::fs;
use std::io;
use std::path::Path;

use serde_json::{Map, Value};

use crate::constants::bundle::{FIELD_CORRECT, FIELD_INFERENCES};
use crate::normalize::RawCorrectness;
use crate::types::ExtraFields;

/// Outcome of reading one bundle file.
#[derive(Debug)]
pub enum BundleRead {
    /// No regular file at the path.
    Missing,
    /// File exists but is not a readable JSON object.
    Malformed(String),
    /// Parsed bundle.
    Loaded(InferenceBundle),
}

/// Parsed bundle fields.
#[derive(Clone, Debug, PartialEq)]
pub struct InferenceBundle {
    fields: Map<String, Value>,
}

impl InferenceBundle {
    /// Parse a bundle from JSON text. Only JSON objects qualify.
    pub fn parse(raw: &str) -> Result<Self, String> {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(fields)) => Ok(Self { fields }),
            Ok(other) => Err(format!("expected a JSON object, found {}", json_kind(&other))),
            Err(err) => Err(err.to_string()),
        }
    }

    /// Raw `correct` field, or `None` when absent or null.
    pub fn correct(&self) -> Option<RawCorrectness> {
        self.fields.get(FIELD_CORRECT).and_then(RawCorrectness::from_json)
    }

    /// `inferences` payload as text. Non-string payloads are kept as JSON text.
    pub fn inferences(&self) -> Option<String> {
        match self.fields.get(FIELD_INFERENCES)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Every field except `exclude`.
    pub fn extra_fields(&self, exclude: &[&str]) -> ExtraFields {
        self.fields
            .iter()
            .filter(|(key, _)| !exclude.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

/// Read and parse the bundle at `path`.
pub fn read_bundle(path: &Path) -> BundleRead {
    if !path.is_file() {
        return BundleRead::Missing;
    }
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return BundleRead::Missing,
        Err(err) => return BundleRead::Malformed(err.to_string()),
    };
    match InferenceBundle::parse(&raw) {
        Ok(bundle) => BundleRead::Loaded(bundle),
        Err(reason) => BundleRead::Malformed(reason),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn reads_loaded_missing_and_malformed() {
        let temp = tempdir().unwrap();
        let good = temp.path().join("0.json");
        std::fs::write(&good, r#"{"correct": true, "inferences": "example text"}"#).unwrap();
        let truncated = temp.path().join("1.json");
        std::fs::write(&truncated, r#"{"correct": tr"#).unwrap();
        let array = temp.path().join("2.json");
        std::fs::write(&array, "[1, 2]").unwrap();

        match read_bundle(&good) {
            BundleRead::Loaded(bundle) => {
                assert_eq!(bundle.correct(), Some(RawCorrectness::Flag(true)));
                assert_eq!(bundle.inferences().as_deref(), Some("example text"));
            }
            other => panic!("unexpected read: {other:?}"),
        }
        assert!(matches!(read_bundle(&truncated), BundleRead::Malformed(_)));
        assert!(matches!(read_bundle(&array), BundleRead::Malformed(_)));
        assert!(matches!(
            read_bundle(&temp.path().join("absent.json")),
            BundleRead::Missing
        ));
    }

    #[test]
    fn null_fields_read_as_absent() {
        let bundle = InferenceBundle::parse(r#"{"correct": null, "inferences": null}"#).unwrap();
        assert_eq!(bundle.correct(), None);
        assert_eq!(bundle.inferences(), None);
    }

    #[test]
    fn structured_inferences_become_json_text() {
        let bundle = InferenceBundle::parse(r#"{"inferences": ["a", "b"]}"#).unwrap();
        assert_eq!(bundle.inferences().as_deref(), Some(r#"["a","b"]"#));
    }

    #[test]
    fn extra_fields_drop_excluded_keys() {
        let bundle = InferenceBundle::parse(
            r#"{"concept": "Stag Hunt", "correct": [true], "prompt": "p", "system_prompt": "s"}"#,
        )
        .unwrap();
        let extra = bundle.extra_fields(&["concept", "correct"]);
        assert_eq!(extra.len(), 2);
        assert_eq!(extra["prompt"], json!("p"));
        assert_eq!(extra["system_prompt"], json!("s"));
    }
}
