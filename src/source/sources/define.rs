use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{BenchmarkLayout, Catalog};
use crate::constants::sources::{
    DEFINE_SOURCE_ID, SKIP_INCOMPLETE_ROW_MSG, SKIP_MISSING_CONTENT_MSG,
};
use crate::constants::table::{COLUMN_CONCEPT, COLUMN_CORRECT, COLUMN_FILE, COLUMN_MODEL};
use crate::data::{Record, Task};
use crate::errors::PotemkinError;
use crate::normalize::{RawCorrectness, RecordFields, RecordNormalizer};
use crate::source::{RecordSource, RecordStream};
use crate::transport::fs::{model_dir, path_string, read_text_if_present};
use crate::transport::table::{LabelRow, LabelTable};

const REQUIRED_COLUMNS: &[&str] = &[COLUMN_CONCEPT, COLUMN_MODEL, COLUMN_FILE, COLUMN_CORRECT];
const CORE_COLUMNS: &[&str] = &[COLUMN_CONCEPT, COLUMN_MODEL, COLUMN_CORRECT];

/// Define-task source: one label table plus loose text files at
/// `<inferences>/<concept>/<model>/<file>`.
///
/// The table carries the columns `Concept, Model, File[, Correct]`. The
/// `Correct` column is required here like the other three: a table without it
/// fails with `MissingColumn`, and a row with an empty `Correct` cell has no
/// outcome to condition on and is dropped as incomplete. An empty `File` cell
/// keeps the row with `content = None`.
///
/// A row whose content file is absent still yields a record with
/// `content = None`; the task may have been skipped upstream.
pub struct DefineSource {
    labels: PathBuf,
    inferences: PathBuf,
    normalizer: RecordNormalizer,
}

impl DefineSource {
    /// `labels` is the Define label table; content files live under `inferences`.
    pub fn new(
        labels: impl Into<PathBuf>,
        inferences: impl Into<PathBuf>,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            labels: labels.into(),
            inferences: inferences.into(),
            normalizer: RecordNormalizer::new(DEFINE_SOURCE_ID, Task::Define, catalog),
        }
    }

    /// Build from a benchmark layout.
    pub fn from_layout(layout: &BenchmarkLayout, catalog: Arc<Catalog>) -> Self {
        Self::new(
            layout.resolve(&layout.define_labels),
            layout.resolve(&layout.define_inferences),
            catalog,
        )
    }

    fn build_record(&self, row: LabelRow) -> Result<Option<Record>, PotemkinError> {
        let (Some(concept), Some(raw_model), Some(raw_correct)) = (
            row.value(COLUMN_CONCEPT),
            row.value(COLUMN_MODEL),
            row.value(COLUMN_CORRECT),
        ) else {
            debug!(
                source_id = DEFINE_SOURCE_ID,
                location = %row.location(),
                SKIP_INCOMPLETE_ROW_MSG
            );
            return Ok(None);
        };
        let correct = self.normalizer.correct(
            &RawCorrectness::Text(raw_correct.to_string()),
            row.location(),
        )?;

        let model = self.normalizer.canonical_model(raw_model);
        let (source_file, content) = match row.value(COLUMN_FILE) {
            Some(file) => {
                let path = self.content_path(concept, raw_model, &model, file);
                (path_string(&path), self.read_content(&path))
            }
            None => (row.location(), None),
        };

        Ok(Some(self.normalizer.build(RecordFields {
            concept: concept.to_string(),
            model,
            correct,
            source_file,
            content,
            extra: row.extra_fields(CORE_COLUMNS),
        })))
    }

    /// Content path using the model as written in the row, falling back to
    /// the canonical model directory when only that one holds the file.
    fn content_path(&self, concept: &str, raw_model: &str, canonical: &str, file: &str) -> PathBuf {
        let primary = model_dir(&self.inferences, concept, raw_model).join(file);
        if primary.is_file() || raw_model == canonical {
            return primary;
        }
        let fallback = model_dir(&self.inferences, concept, canonical).join(file);
        if fallback.is_file() { fallback } else { primary }
    }

    fn read_content(&self, path: &Path) -> Option<String> {
        match read_text_if_present(path) {
            Ok(Some(content)) => Some(content),
            Ok(None) => {
                debug!(
                    source_id = DEFINE_SOURCE_ID,
                    path = %path.display(),
                    SKIP_MISSING_CONTENT_MSG
                );
                None
            }
            Err(err) => {
                warn!(
                    source_id = DEFINE_SOURCE_ID,
                    path = %path.display(),
                    error = %err,
                    "content file unreadable"
                );
                None
            }
        }
    }
}

impl RecordSource for DefineSource {
    fn id(&self) -> &str {
        self.normalizer.source_id()
    }

    fn task(&self) -> Task {
        Task::Define
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        let table = LabelTable::open(DEFINE_SOURCE_ID, &self.labels, REQUIRED_COLUMNS)?;
        Ok(Box::new(table.rows().filter_map(move |row| {
            row.and_then(|row| self.build_record(row)).transpose()
        })))
    }
}
