#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Report runner shared by the `potemkin_rates` binary.
pub mod apps;
/// Benchmark layout and label catalog configuration.
pub mod config;
/// Centralized constants: reference label sets, layout paths, column names.
pub mod constants;
/// Record, task, domain and correctness types.
pub mod data;
/// Concept to domain classification.
pub mod domain;
/// Keystone index and grouped rate aggregation.
pub mod metrics;
/// Model-name canonicalization.
pub mod models;
/// Correctness normalization and record construction.
pub mod normalize;
/// Query facade and text rendering.
pub mod report;
/// Record source trait and the four task sources.
pub mod source;
/// Subject-model seam and answer grading helpers.
pub mod subject;
/// Input transports used by sources (files, label tables, bundles).
pub mod transport;
/// Shared type aliases.
pub mod types;

mod errors;

pub use config::{BenchmarkConfig, BenchmarkLayout, Catalog};
pub use data::{Correctness, Domain, Record, Task};
pub use domain::{DomainClassifier, LabelSet};
pub use errors::PotemkinError;
pub use metrics::{Aggregator, Breakdown, GroupKey, GroupRate, KeystoneIndex, MetricResult};
pub use models::ModelCanonicalizer;
pub use normalize::{RawCorrectness, RecordNormalizer, normalize_correct};
pub use report::{PotemkinReport, ReportView};
pub use source::{
    ClassifySource, DefineSource, DynSource, EditSource, GenerateSource, InMemorySource,
    RecordSource, RecordStream,
};
pub use subject::{CoherenceTally, SubjectModel, SubjectResponse, Verdict};
pub use types::{Concept, ExtraFields, GroupName, ModelName, PathString, SourceId};
