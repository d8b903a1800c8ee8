use std::path::PathBuf;
use std::sync::Arc;

use tracing::debug;

use crate::config::{BenchmarkLayout, Catalog};
use crate::constants::sources::{CLASSIFY_SOURCE_ID, SKIP_INCOMPLETE_ROW_MSG};
use crate::constants::table::{COLUMN_CONCEPT, COLUMN_CORRECT, COLUMN_INFERENCE, COLUMN_MODEL};
use crate::data::{Record, Task};
use crate::errors::PotemkinError;
use crate::normalize::{RawCorrectness, RecordFields, RecordNormalizer};
use crate::source::{RecordSource, RecordStream};
use crate::transport::fs::file_name_string;
use crate::transport::table::{LabelRow, LabelTable};
use crate::types::PathString;

const REQUIRED_COLUMNS: &[&str] = &[COLUMN_CONCEPT, COLUMN_MODEL, COLUMN_INFERENCE, COLUMN_CORRECT];

/// Classify-task source: one CSV table per domain group, each row carrying
/// its own free-text inference and correctness.
///
/// Tables are concatenated without deduplication. A concept/model pair present
/// in more than one table is emitted once per table.
pub struct ClassifySource {
    tables: Vec<PathBuf>,
    normalizer: RecordNormalizer,
}

impl ClassifySource {
    /// Source over `tables`, read in the given order.
    pub fn new<I, P>(tables: I, catalog: Arc<Catalog>) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            tables: tables.into_iter().map(Into::into).collect(),
            normalizer: RecordNormalizer::new(CLASSIFY_SOURCE_ID, Task::Classify, catalog),
        }
    }

    /// Build from a benchmark layout.
    pub fn from_layout(layout: &BenchmarkLayout, catalog: Arc<Catalog>) -> Self {
        Self::new(
            layout
                .classify_tables
                .iter()
                .map(|table| layout.resolve(table)),
            catalog,
        )
    }

    fn build_record(
        &self,
        table_name: &PathString,
        row: LabelRow,
    ) -> Result<Option<Record>, PotemkinError> {
        let (Some(concept), Some(model), Some(inference), Some(raw_correct)) = (
            row.value(COLUMN_CONCEPT),
            row.value(COLUMN_MODEL),
            row.value(COLUMN_INFERENCE),
            row.value(COLUMN_CORRECT),
        ) else {
            debug!(
                source_id = CLASSIFY_SOURCE_ID,
                location = %row.location(),
                SKIP_INCOMPLETE_ROW_MSG
            );
            return Ok(None);
        };
        let correct = self.normalizer.correct(
            &RawCorrectness::Text(raw_correct.to_string()),
            row.location(),
        )?;
        Ok(Some(self.normalizer.build(RecordFields {
            concept: concept.to_string(),
            model: self.normalizer.canonical_model(model),
            correct,
            source_file: table_name.clone(),
            content: Some(inference.to_string()),
            extra: row.extra_fields(REQUIRED_COLUMNS),
        })))
    }
}

impl RecordSource for ClassifySource {
    fn id(&self) -> &str {
        self.normalizer.source_id()
    }

    fn task(&self) -> Task {
        Task::Classify
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        let mut tables = Vec::with_capacity(self.tables.len());
        for path in &self.tables {
            let table = LabelTable::open(CLASSIFY_SOURCE_ID, path, REQUIRED_COLUMNS)?;
            tables.push((file_name_string(path), table));
        }
        Ok(Box::new(tables.into_iter().flat_map(move |(table_name, table)| {
            table.rows().filter_map(move |row| {
                row.and_then(|row| self.build_record(&table_name, row))
                    .transpose()
            })
        })))
    }
}
