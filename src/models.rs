//! Full model identifier to short display name lookup.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::constants::models::MODEL_ALIASES;
use crate::types::ModelName;

/// Fixed alias table mapping raw model identifiers to canonical short names.
///
/// Lookups never fail: an unmapped identifier is returned unchanged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelCanonicalizer {
    aliases: IndexMap<ModelName, ModelName>,
}

impl ModelCanonicalizer {
    /// Build a canonicalizer from `(raw, canonical)` pairs. Later pairs win on duplicate keys.
    pub fn new<I, R, C>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (R, C)>,
        R: Into<ModelName>,
        C: Into<ModelName>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|(raw, canonical)| (raw.into(), canonical.into()))
                .collect(),
        }
    }

    /// Map a raw identifier to its short name.
    ///
    /// The lookup key is trimmed; an unmapped identifier comes back exactly as
    /// given, surrounding whitespace included.
    pub fn canonicalize(&self, raw_model: &str) -> ModelName {
        self.aliases
            .get(raw_model.trim())
            .cloned()
            .unwrap_or_else(|| raw_model.to_string())
    }

    /// Distinct canonical names in table order.
    pub fn canonical_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for name in self.aliases.values() {
            if !names.contains(&name.as_str()) {
                names.push(name);
            }
        }
        names
    }

    /// Number of alias entries, duplicates of a canonical name included.
    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    /// True when the table has no aliases.
    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }
}

impl Default for ModelCanonicalizer {
    fn default() -> Self {
        Self::new(MODEL_ALIASES.iter().copied())
    }
}
