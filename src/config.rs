use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::constants::layout;
use crate::domain::DomainClassifier;
use crate::errors::PotemkinError;
use crate::models::ModelCanonicalizer;

/// Immutable label data injected into every source at construction time.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Concept to domain classifier.
    #[serde(default)]
    pub domains: DomainClassifier,
    /// Raw to canonical model name table.
    #[serde(default)]
    pub models: ModelCanonicalizer,
}

impl Catalog {
    /// Build a catalog from substitute label sets and model aliases.
    pub fn new(domains: DomainClassifier, models: ModelCanonicalizer) -> Self {
        Self { domains, models }
    }
}

/// Paths of every label table and content root read by the task sources.
///
/// Relative paths are resolved against `root`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkLayout {
    /// Benchmark tree root.
    pub root: PathBuf,
    /// Define label table.
    pub define_labels: PathBuf,
    /// Define content root (`<concept>/<model>/<file>` below it).
    pub define_inferences: PathBuf,
    /// Classify tables, one per domain group.
    pub classify_tables: Vec<PathBuf>,
    /// Generate label table.
    pub generate_labels: PathBuf,
    /// Generate task root (bundles under `inferences/`).
    pub generate_root: PathBuf,
    /// Edit label table.
    pub edit_labels: PathBuf,
    /// Edit task root (bundles under `inferences/`).
    pub edit_root: PathBuf,
}

impl BenchmarkLayout {
    /// Default layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            define_labels: layout::DEFINE_LABELS.into(),
            define_inferences: layout::DEFINE_INFERENCES.into(),
            classify_tables: vec![layout::CLASSIFY_PSYCH.into(), layout::CLASSIFY_OTHER.into()],
            generate_labels: layout::GENERATE_LABELS.into(),
            generate_root: layout::GENERATE_ROOT.into(),
            edit_labels: layout::EDIT_LABELS.into(),
            edit_root: layout::EDIT_ROOT.into(),
        }
    }

    /// Resolve a layout path against the root. Absolute paths are kept.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Default for BenchmarkLayout {
    fn default() -> Self {
        Self::new(".")
    }
}

/// Top-level configuration: where the files are and how to label them.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Paths of the four task layouts.
    #[serde(default)]
    pub layout: BenchmarkLayout,
    /// Label sets and model aliases shared by every source.
    #[serde(default)]
    pub catalog: Arc<Catalog>,
}

impl BenchmarkConfig {
    /// Default layout and built-in catalog rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            layout: BenchmarkLayout::new(root),
            catalog: Arc::new(Catalog::default()),
        }
    }

    /// Load a config from a JSON file. Missing keys fall back to defaults.
    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, PotemkinError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            PotemkinError::Configuration(format!(
                "failed to open config '{}': {err}",
                path.display()
            ))
        })?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Override the benchmark root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.layout.root = root.into();
        self
    }

    /// Replace the layout.
    pub fn with_layout(mut self, layout: BenchmarkLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Replace the label catalog.
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Arc::new(catalog);
        self
    }
}
