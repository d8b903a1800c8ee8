//! Generate and Edit sources.
//!
//! Both tasks share one two-branch layout below `<root>/inferences`:
//! - game-theory concepts are discovered by enumerating every
//!   `<concept>/<model>` directory and loading each bundle found there;
//! - every other concept is read through the task label table, one bundle
//!   per row.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::{BenchmarkLayout, Catalog};
use crate::constants::bundle::{FIELD_CONCEPT, FIELD_CORRECT};
use crate::constants::layout::INFERENCES_DIR;
use crate::constants::sources::{
    EDIT_SOURCE_ID, GENERATE_SOURCE_ID, SKIP_INCOMPLETE_ROW_MSG, SKIP_MALFORMED_BUNDLE_MSG,
    SKIP_MISSING_CONTENT_MSG, SKIP_MISSING_DIR_MSG,
};
use crate::constants::table::{COLUMN_CONCEPT, COLUMN_CORRECT, COLUMN_FILE, COLUMN_MODEL};
use crate::data::{Record, Task};
use crate::errors::PotemkinError;
use crate::normalize::{RawCorrectness, RecordFields, RecordNormalizer};
use crate::source::{RecordSource, RecordStream};
use crate::transport::bundle::{BundleRead, read_bundle};
use crate::transport::fs::{list_files, model_dir, path_string};
use crate::transport::table::{LabelRow, LabelTable};

const REQUIRED_COLUMNS: &[&str] = &[COLUMN_CONCEPT, COLUMN_MODEL, COLUMN_FILE, COLUMN_CORRECT];
const CORE_COLUMNS: &[&str] = &[COLUMN_CONCEPT, COLUMN_MODEL, COLUMN_CORRECT];
const BUNDLE_CORE_FIELDS: &[&str] = &[FIELD_CONCEPT, FIELD_CORRECT];

/// Shared reader for the Generate/Edit bundle layout.
///
/// Missing-data policy differs from the Define source: an absent model
/// directory or an absent bundle skips the row entirely rather than emitting
/// a record with empty content.
struct BundleLayoutReader {
    labels: PathBuf,
    inferences: PathBuf,
    normalizer: RecordNormalizer,
}

impl BundleLayoutReader {
    fn new(
        source_id: &str,
        task: Task,
        labels: PathBuf,
        root: PathBuf,
        catalog: Arc<Catalog>,
    ) -> Self {
        Self {
            labels,
            inferences: root.join(INFERENCES_DIR),
            normalizer: RecordNormalizer::new(source_id, task, catalog),
        }
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        let table = LabelTable::open(self.normalizer.source_id(), &self.labels, REQUIRED_COLUMNS)?;
        let labeled = table
            .rows()
            .filter_map(move |row| row.and_then(|row| self.labeled_record(row)).transpose());
        Ok(Box::new(self.enumerated_records().chain(labeled)))
    }

    /// Game-theory branch: every known concept x every canonical model.
    fn enumerated_records(&self) -> impl Iterator<Item = Result<Record, PotemkinError>> + '_ {
        let catalog = self.normalizer.catalog();
        let models: Vec<String> = catalog
            .models
            .canonical_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        let pairs: Vec<(String, String)> = catalog
            .domains
            .game_theory_concepts()
            .into_iter()
            .flat_map(|concept| {
                models
                    .iter()
                    .map(move |model| (concept.to_string(), model.clone()))
            })
            .collect();

        pairs
            .into_iter()
            .filter_map(move |(concept, model)| {
                let dir = model_dir(&self.inferences, &concept, &model);
                if dir.is_dir() {
                    Some((concept, model, dir))
                } else {
                    None
                }
            })
            .flat_map(|(concept, model, dir)| {
                list_files(&dir)
                    .into_iter()
                    .map(move |path| (concept.clone(), model.clone(), path))
            })
            .filter_map(move |(concept, model, path)| {
                self.enumerated_record(&concept, &model, &path).transpose()
            })
    }

    fn enumerated_record(
        &self,
        concept: &str,
        model: &str,
        path: &Path,
    ) -> Result<Option<Record>, PotemkinError> {
        let bundle = match read_bundle(path) {
            BundleRead::Loaded(bundle) => bundle,
            BundleRead::Missing => return Ok(None),
            BundleRead::Malformed(reason) => {
                warn!(
                    source_id = %self.normalizer.source_id(),
                    path = %path.display(),
                    error = %reason,
                    SKIP_MALFORMED_BUNDLE_MSG
                );
                return Ok(None);
            }
        };
        let Some(raw_correct) = bundle.correct() else {
            warn!(
                source_id = %self.normalizer.source_id(),
                path = %path.display(),
                error = "missing correct field",
                SKIP_MALFORMED_BUNDLE_MSG
            );
            return Ok(None);
        };
        let correct = self.normalizer.correct(&raw_correct, path_string(path))?;
        Ok(Some(self.normalizer.build(RecordFields {
            concept: concept.to_string(),
            model: model.to_string(),
            correct,
            source_file: path_string(path),
            content: bundle.inferences(),
            extra: bundle.extra_fields(BUNDLE_CORE_FIELDS),
        })))
    }

    /// Label-table branch for every non-game-theory concept.
    fn labeled_record(&self, row: LabelRow) -> Result<Option<Record>, PotemkinError> {
        let (Some(concept), Some(raw_model), Some(file), Some(raw_correct)) = (
            row.value(COLUMN_CONCEPT),
            row.value(COLUMN_MODEL),
            row.value(COLUMN_FILE),
            row.value(COLUMN_CORRECT),
        ) else {
            debug!(
                source_id = %self.normalizer.source_id(),
                location = %row.location(),
                SKIP_INCOMPLETE_ROW_MSG
            );
            return Ok(None);
        };
        let catalog = self.normalizer.catalog();
        if catalog.domains.is_game_theory(concept) {
            return Ok(None);
        }
        let correct = self.normalizer.correct(
            &RawCorrectness::Text(raw_correct.to_string()),
            row.location(),
        )?;

        let model = self.normalizer.canonical_model(raw_model);
        let dir = model_dir(&self.inferences, concept, &model);
        if !dir.is_dir() {
            debug!(
                source_id = %self.normalizer.source_id(),
                path = %dir.display(),
                SKIP_MISSING_DIR_MSG
            );
            return Ok(None);
        }
        let path = dir.join(file);
        let content = match read_bundle(&path) {
            BundleRead::Loaded(bundle) => bundle.inferences(),
            BundleRead::Missing => {
                debug!(
                    source_id = %self.normalizer.source_id(),
                    path = %path.display(),
                    SKIP_MISSING_CONTENT_MSG
                );
                return Ok(None);
            }
            BundleRead::Malformed(reason) => {
                warn!(
                    source_id = %self.normalizer.source_id(),
                    path = %path.display(),
                    error = %reason,
                    SKIP_MALFORMED_BUNDLE_MSG
                );
                return Ok(None);
            }
        };

        Ok(Some(self.normalizer.build(RecordFields {
            concept: concept.to_string(),
            model,
            correct,
            source_file: path_string(&path),
            content,
            extra: row.extra_fields(CORE_COLUMNS),
        })))
    }
}

/// Generate-task source.
pub struct GenerateSource {
    reader: BundleLayoutReader,
}

impl GenerateSource {
    /// `labels` is the author label table; bundles live in `<root>/inferences`.
    pub fn new(labels: impl Into<PathBuf>, root: impl Into<PathBuf>, catalog: Arc<Catalog>) -> Self {
        Self {
            reader: BundleLayoutReader::new(
                GENERATE_SOURCE_ID,
                Task::Generate,
                labels.into(),
                root.into(),
                catalog,
            ),
        }
    }

    /// Build from a benchmark layout.
    pub fn from_layout(layout: &BenchmarkLayout, catalog: Arc<Catalog>) -> Self {
        Self::new(
            layout.resolve(&layout.generate_labels),
            layout.resolve(&layout.generate_root),
            catalog,
        )
    }
}

impl RecordSource for GenerateSource {
    fn id(&self) -> &str {
        self.reader.normalizer.source_id()
    }

    fn task(&self) -> Task {
        Task::Generate
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        self.reader.stream()
    }
}

/// Edit-task source.
pub struct EditSource {
    reader: BundleLayoutReader,
}

impl EditSource {
    /// `labels` is the author label table; bundles live in `<root>/inferences`.
    pub fn new(labels: impl Into<PathBuf>, root: impl Into<PathBuf>, catalog: Arc<Catalog>) -> Self {
        Self {
            reader: BundleLayoutReader::new(
                EDIT_SOURCE_ID,
                Task::Edit,
                labels.into(),
                root.into(),
                catalog,
            ),
        }
    }

    /// Build from a benchmark layout.
    pub fn from_layout(layout: &BenchmarkLayout, catalog: Arc<Catalog>) -> Self {
        Self::new(
            layout.resolve(&layout.edit_labels),
            layout.resolve(&layout.edit_root),
            catalog,
        )
    }
}

impl RecordSource for EditSource {
    fn id(&self) -> &str {
        self.reader.normalizer.source_id()
    }

    fn task(&self) -> Task {
        Task::Edit
    }

    fn stream(&self) -> Result<RecordStream<'_>, PotemkinError> {
        self.reader.stream()
    }
}
