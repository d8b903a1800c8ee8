//! Record source interfaces.
//!
//! Ownership model:
//! - `RecordSource` is the aggregator-facing interface; one implementing type
//!   per benchmark task, each owning its on-disk layout.
//! - Sources hold only paths and an injected `Catalog`. Every `stream` call
//!   re-reads storage, so streams are restartable and sources keep no state
//!   between calls.

use std::sync::Arc;

use crate::data::{Record, Task};
use crate::errors::PotemkinError;
use crate::types::SourceId;

/// Source implementation modules.
pub mod sources;

pub use sources::bundle::{EditSource, GenerateSource};
pub use sources::classify::ClassifySource;
pub use sources::define::DefineSource;

/// Lazy record sequence produced by one `stream` call.
///
/// Items are pulled one at a time. An `Err` item is a hard failure of the
/// stream (for example an unrecognized correctness encoding); consumers stop
/// at the first one.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<Record, PotemkinError>> + 'a>;

/// Boxed source handle used by the aggregator.
pub type DynSource = Arc<dyn RecordSource>;

/// Aggregator-facing record source.
///
/// For a fixed file tree, repeated `stream` calls yield the same multiset of
/// records.
pub trait RecordSource: Send + Sync {
    /// Stable source identifier used in errors and logs.
    fn id(&self) -> &str;
    /// Task every emitted record is tagged with.
    fn task(&self) -> Task;
    /// Open the backing label tables and return a lazy record stream.
    ///
    /// Fails up front when a label table is absent or lacks a required column.
    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError>;
}

/// In-memory record source for tests and pre-collected records.
pub struct InMemorySource {
    id: SourceId,
    task: Task,
    records: Arc<Vec<Record>>,
}

impl InMemorySource {
    /// Create an in-memory source. Records are emitted as given.
    pub fn new(id: impl Into<SourceId>, task: Task, records: Vec<Record>) -> Self {
        Self {
            id: id.into(),
            task,
            records: Arc::new(records),
        }
    }
}

impl RecordSource for InMemorySource {
    fn id(&self) -> &str {
        &self.id
    }

    fn task(&self) -> Task {
        self.task
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        Ok(Box::new(self.records.iter().cloned().map(Ok)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Correctness, Domain};
    use crate::types::ExtraFields;

    fn record(concept: &str) -> Record {
        Record {
            concept: concept.to_string(),
            model: "GPT-4o".to_string(),
            domain: Domain::Unknown,
            task: Task::Generate,
            correct: Correctness::Yes,
            source_file: "memory".to_string(),
            content: None,
            extra: ExtraFields::new(),
        }
    }

    #[test]
    fn in_memory_stream_is_restartable() {
        let source = InMemorySource::new("memory", Task::Generate, vec![record("A"), record("B")]);
        let first: Vec<Record> = source.stream().unwrap().collect::<Result<_, _>>().unwrap();
        let second: Vec<Record> = source.stream().unwrap().collect::<Result<_, _>>().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
        assert_eq!(source.id(), "memory");
        assert_eq!(source.task(), Task::Generate);
    }
}
