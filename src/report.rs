//! Query facade over the four task sources.

use std::sync::Arc;

use crate::config::BenchmarkConfig;
use crate::data::Task;
use crate::errors::PotemkinError;
use crate::metrics::{Aggregator, Breakdown, GroupKey, GroupRate, KeystoneIndex, MetricResult};
use crate::source::{ClassifySource, DefineSource, DynSource, EditSource, GenerateSource};

/// Entry point for rate queries. Every call re-reads the benchmark tree.
pub struct PotemkinReport {
    aggregator: Aggregator,
}

impl PotemkinReport {
    /// Register the Define, Classify, Generate and Edit sources of `config`.
    pub fn from_config(config: &BenchmarkConfig) -> Self {
        let layout = &config.layout;
        let catalog = &config.catalog;
        let sources: Vec<DynSource> = vec![
            Arc::new(DefineSource::from_layout(layout, Arc::clone(catalog))),
            Arc::new(ClassifySource::from_layout(layout, Arc::clone(catalog))),
            Arc::new(GenerateSource::from_layout(layout, Arc::clone(catalog))),
            Arc::new(EditSource::from_layout(layout, Arc::clone(catalog))),
        ];
        Self::from_sources(sources)
    }

    /// Wrap an explicit source list.
    pub fn from_sources(sources: Vec<DynSource>) -> Self {
        Self {
            aggregator: Aggregator::new(sources),
        }
    }

    /// Underlying aggregator.
    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Pairs with a correct Define record.
    pub fn keystone_index(&self) -> Result<KeystoneIndex, PotemkinError> {
        self.aggregator.build_keystone_index()
    }

    /// Percent correct per domain.
    pub fn by_domain(&self) -> Result<MetricResult, PotemkinError> {
        self.aggregator.rate_by(GroupKey::Domain)
    }

    /// Percent correct per canonical model.
    pub fn by_model(&self) -> Result<MetricResult, PotemkinError> {
        self.aggregator.rate_by(GroupKey::Model)
    }

    /// Percent correct per task.
    pub fn by_task(&self) -> Result<MetricResult, PotemkinError> {
        self.aggregator.rate_by(GroupKey::Task)
    }

    /// Keystone-conditioned Potemkin rate for Classify, Generate and Edit.
    pub fn conditioned_by_task(&self) -> Result<MetricResult, PotemkinError> {
        self.aggregator.conditioned_rate_by_task()
    }

    /// Percent correct across every record.
    pub fn overall(&self) -> Result<GroupRate, PotemkinError> {
        self.aggregator.overall_rate()
    }

    /// Record count per task.
    pub fn inference_counts(&self) -> Result<Breakdown, PotemkinError> {
        self.aggregator.record_counts()
    }

    /// Record count of one task per model or domain.
    pub fn task_breakdown(&self, task: Task, key: GroupKey) -> Result<Breakdown, PotemkinError> {
        self.aggregator.breakdown(task, key)
    }

    /// Every view rendered as plain text, in report order.
    pub fn render_summary(&self) -> Result<String, PotemkinError> {
        let mut out = String::new();
        self.render_view(ReportView::Counts, &mut out)?;
        self.render_view(ReportView::Domain, &mut out)?;
        self.render_view(ReportView::Model, &mut out)?;
        self.render_view(ReportView::Task, &mut out)?;
        self.render_view(ReportView::Conditioned, &mut out)?;
        self.render_view(ReportView::Overall, &mut out)?;
        Ok(out)
    }

    /// Append one view to `out`.
    pub fn render_view(&self, view: ReportView, out: &mut String) -> Result<(), PotemkinError> {
        let section = match view {
            ReportView::Domain => format!("\nPercent correct by domain:\n{}", self.by_domain()?),
            ReportView::Model => format!("\nPercent correct by model:\n{}", self.by_model()?),
            ReportView::Task => format!("\nPercent correct by task:\n{}", self.by_task()?),
            ReportView::Conditioned => format!(
                "\nPotemkin rate conditioned on keystone success:\n{}",
                self.conditioned_by_task()?
            ),
            ReportView::Overall => format!("\nOverall percent correct:\n  {}\n", self.overall()?),
            ReportView::Counts => {
                let counts = self.inference_counts()?;
                format!("\nRecords per task (total {}):\n{counts}", counts.total)
            }
        };
        out.push_str(&section);
        Ok(())
    }
}

/// A single rendered section of the report.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReportView {
    /// Percent correct by domain.
    Domain,
    /// Percent correct by model.
    Model,
    /// Percent correct by task.
    Task,
    /// Keystone-conditioned Potemkin rate per task.
    Conditioned,
    /// Percent correct across all records.
    Overall,
    /// Record counts per task.
    Counts,
}
