use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::types::{Concept, ExtraFields, ModelName, PathString};

/// Concept category derived from the reference label sets.
///
/// `Unknown` is a valid terminal state for concepts outside all three sets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Domain {
    /// Cognitive and psychological bias concepts.
    PsychologicalBiases,
    /// Game-theory concepts; their Generate/Edit bundles are enumerated from disk.
    GameTheory,
    /// Literary technique concepts.
    LiteraryTechniques,
    /// Concept outside every label set.
    Unknown,
}

impl Domain {
    /// Every domain, in classification priority order followed by `Unknown`.
    pub const ALL: [Domain; 4] = [
        Domain::PsychologicalBiases,
        Domain::GameTheory,
        Domain::LiteraryTechniques,
        Domain::Unknown,
    ];

    /// Display name used as a metric group key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::PsychologicalBiases => "Psychological Biases",
            Domain::GameTheory => "Game Theory",
            Domain::LiteraryTechniques => "Literary Techniques",
            Domain::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmark task that produced a record. Set by the source, never inferred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Task {
    /// Keystone task: the model explains the concept.
    Define,
    /// The model labels examples as instances of the concept or not.
    Classify,
    /// The model produces a new instance of the concept.
    Generate,
    /// The model edits text to make it match the concept or not.
    Edit,
}

impl Task {
    /// Every task in pipeline order.
    pub const ALL: [Task; 4] = [Task::Define, Task::Classify, Task::Generate, Task::Edit];
    /// Tasks whose accuracy is conditioned on keystone success.
    pub const CONDITIONED: [Task; 3] = [Task::Classify, Task::Generate, Task::Edit];

    /// Display name used as a metric group key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Define => "Define",
            Task::Classify => "Classify",
            Task::Generate => "Generate",
            Task::Edit => "Edit",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical two-valued outcome of a judged record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Correctness {
    /// Judged correct.
    Yes,
    /// Judged incorrect.
    No,
}

impl Correctness {
    /// True for `Yes`.
    pub fn is_yes(&self) -> bool {
        matches!(self, Correctness::Yes)
    }

    /// Lowercase label (`yes` / `no`).
    pub fn as_str(&self) -> &'static str {
        match self {
            Correctness::Yes => "yes",
            Correctness::No => "no",
        }
    }
}

impl From<bool> for Correctness {
    fn from(value: bool) -> Self {
        if value {
            Correctness::Yes
        } else {
            Correctness::No
        }
    }
}

/// Normalized record produced by every task source.
///
/// Records are immutable once emitted; nothing downstream rewrites them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Tested concept label (trimmed, non-empty).
    pub concept: Concept,
    /// Canonical short model name, or the raw identifier when unmapped.
    pub model: ModelName,
    /// Domain derived from the concept.
    pub domain: Domain,
    /// Task of the source that produced this record.
    pub task: Task,
    /// Normalized outcome.
    pub correct: Correctness,
    /// Path or table name the record was read from.
    pub source_file: PathString,
    /// Free-text payload; `None` when the backing file was missing or unreadable.
    pub content: Option<String>,
    /// Source-specific fields kept verbatim.
    #[serde(default)]
    pub extra: ExtraFields,
}

impl Record {
    /// `(concept, model)` pair used for keystone lookups.
    pub fn pair(&self) -> (&str, &str) {
        (&self.concept, &self.model)
    }
}
