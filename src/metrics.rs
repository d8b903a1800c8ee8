//! Keystone-conditioned rate aggregation over merged record streams.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

use tracing::info;

use crate::constants::metrics::{CLASSIFY_CHANCE_ACCURACY, MAX_RATE};
use crate::data::{Record, Task};
use crate::errors::PotemkinError;
use crate::source::DynSource;
use crate::types::{Concept, GroupName, ModelName};

/// `(concept, model)` pairs whose Define record was judged correct.
///
/// Models are keyed by concept so membership checks borrow both names.
/// Built once per aggregation run and never mutated afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeystoneIndex {
    models_by_concept: HashMap<Concept, HashSet<ModelName>>,
}

impl KeystoneIndex {
    /// Keep the pairs of correct Define records. Other tasks are ignored.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Record>,
    {
        records
            .into_iter()
            .filter(|record| record.task == Task::Define && record.correct.is_yes())
            .map(|record| (record.concept.clone(), record.model.clone()))
            .collect()
    }

    fn insert(&mut self, concept: Concept, model: ModelName) {
        self.models_by_concept.entry(concept).or_default().insert(model);
    }

    /// Exact string membership on canonicalized names.
    pub fn contains(&self, concept: &str, model: &str) -> bool {
        self.models_by_concept
            .get(concept)
            .is_some_and(|models| models.contains(model))
    }

    /// Number of distinct pairs.
    pub fn len(&self) -> usize {
        self.models_by_concept.values().map(HashSet::len).sum()
    }

    /// True when no Define record was correct.
    pub fn is_empty(&self) -> bool {
        self.models_by_concept.is_empty()
    }

    /// Pairs in sorted order.
    pub fn pairs(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .models_by_concept
            .iter()
            .flat_map(|(concept, models)| {
                models
                    .iter()
                    .map(move |model| (concept.as_str(), model.as_str()))
            })
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl FromIterator<(Concept, ModelName)> for KeystoneIndex {
    fn from_iter<T: IntoIterator<Item = (Concept, ModelName)>>(iter: T) -> Self {
        let mut index = Self::default();
        for (concept, model) in iter {
            index.insert(concept, model);
        }
        index
    }
}

/// Grouping dimension for [`Aggregator::rate_by`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// Concept domain display name.
    Domain,
    /// Canonical model name.
    Model,
    /// Task name.
    Task,
}

impl GroupKey {
    /// Group name of a record under this key.
    pub fn group_of(&self, record: &Record) -> GroupName {
        match self {
            GroupKey::Domain => record.domain.as_str().to_string(),
            GroupKey::Model => record.model.clone(),
            GroupKey::Task => record.task.as_str().to_string(),
        }
    }
}

/// A rate with the counts it was computed from.
///
/// `rate` is `None` when the group had no records ("not applicable").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroupRate {
    /// Correct records counted.
    pub numerator: usize,
    /// Records counted.
    pub denominator: usize,
    /// Percentage in `[0, 100]`, or `None` when not applicable.
    pub rate: Option<f64>,
}

impl GroupRate {
    /// Percentage of `numerator / denominator`, or not applicable when empty.
    pub fn percent(numerator: usize, denominator: usize) -> Self {
        Self {
            numerator,
            denominator,
            rate: ratio(numerator, denominator).map(|value| value * 100.0),
        }
    }

    /// Chance-corrected Potemkin rate for `task` from correct/total counts.
    pub fn potemkin(task: Task, correct: usize, total: usize) -> Self {
        Self {
            numerator: correct,
            denominator: total,
            rate: ratio(correct, total).map(|accuracy| potemkin_rate(task, accuracy)),
        }
    }

    /// False for groups with no records.
    pub fn is_applicable(&self) -> bool {
        self.rate.is_some()
    }
}

impl fmt::Display for GroupRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.rate {
            Some(rate) => write!(f, "{rate:.2}%"),
            None => f.write_str("n/a"),
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> Option<f64> {
    if denominator == 0 {
        None
    } else {
        Some(numerator as f64 / denominator as f64)
    }
}

/// Chance factor applied to `1 - accuracy` so that 100 means "no better than chance".
pub fn chance_factor(task: Task) -> f64 {
    match task {
        Task::Classify => 1.0 / (1.0 - CLASSIFY_CHANCE_ACCURACY),
        Task::Define | Task::Generate | Task::Edit => 1.0,
    }
}

/// `(1 - accuracy) * factor * 100`, clamped into `[0, 100]`.
pub fn potemkin_rate(task: Task, accuracy: f64) -> f64 {
    ((1.0 - accuracy) * chance_factor(task) * 100.0).clamp(0.0, MAX_RATE)
}

/// Group name to rate mapping produced fresh by every query.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MetricResult {
    /// Rates keyed by group name, in name order.
    pub groups: BTreeMap<GroupName, GroupRate>,
}

impl MetricResult {
    /// Rate entry of a group.
    pub fn get(&self, group: &str) -> Option<&GroupRate> {
        self.groups.get(group)
    }

    /// Rate of a group, `None` when absent or not applicable.
    pub fn rate(&self, group: &str) -> Option<f64> {
        self.groups.get(group).and_then(|rate| rate.rate)
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no group was produced.
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for MetricResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (group, rate) in &self.groups {
            writeln!(f, "  {group}: {rate}")?;
        }
        Ok(())
    }
}

/// Per-group share of a record count.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupShare {
    /// Group name.
    pub group: GroupName,
    /// Records in the group.
    pub count: usize,
    /// Fraction of the total in `[0, 1]`.
    pub share: f64,
}

/// Counts per group, sorted by count descending then group name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Breakdown {
    /// Records across all groups.
    pub total: usize,
    /// Per-group entries.
    pub groups: Vec<GroupShare>,
}

impl Breakdown {
    /// Build a breakdown from per-group counts.
    pub fn from_counts(counts: &HashMap<GroupName, usize>) -> Self {
        let total: usize = counts.values().sum();
        let mut groups: Vec<GroupShare> = counts
            .iter()
            .map(|(group, count)| GroupShare {
                group: group.clone(),
                count: *count,
                share: if total == 0 {
                    0.0
                } else {
                    *count as f64 / total as f64
                },
            })
            .collect();
        groups.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.group.cmp(&b.group)));
        Self { total, groups }
    }

    /// Count of one group, zero when absent.
    pub fn count(&self, group: &str) -> usize {
        self.groups
            .iter()
            .find(|entry| entry.group == group)
            .map(|entry| entry.count)
            .unwrap_or(0)
    }
}

impl fmt::Display for Breakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.groups {
            writeln!(
                f,
                "  {:>20} -> {:5} ({:6.2}%)",
                entry.group,
                entry.count,
                entry.share * 100.0
            )?;
        }
        Ok(())
    }
}

/// Tally of correct/total counts per group.
#[derive(Default)]
struct Tally {
    groups: BTreeMap<GroupName, (usize, usize)>,
}

impl Tally {
    fn add(&mut self, group: GroupName, correct: bool) {
        let entry = self.groups.entry(group).or_insert((0, 0));
        if correct {
            entry.0 += 1;
        }
        entry.1 += 1;
    }

    fn counts(&self, group: &str) -> (usize, usize) {
        self.groups.get(group).copied().unwrap_or((0, 0))
    }

    fn into_percent_result(self) -> MetricResult {
        MetricResult {
            groups: self
                .groups
                .into_iter()
                .map(|(group, (correct, total))| (group, GroupRate::percent(correct, total)))
                .collect(),
        }
    }
}

/// Pure grouped rate over a record slice.
pub fn rate_by_records<'a, I>(records: I, key: GroupKey) -> MetricResult
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tally = Tally::default();
    for record in records {
        tally.add(key.group_of(record), record.correct.is_yes());
    }
    tally.into_percent_result()
}

/// Pure conditioned Potemkin rates over a record slice.
///
/// Only Classify/Generate/Edit records whose pair is in `index` count. Every
/// conditioned task appears in the result; empty ones are not applicable.
pub fn conditioned_rate_by_records<'a, I>(records: I, index: &KeystoneIndex) -> MetricResult
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut tally = Tally::default();
    for record in records {
        if record.task == Task::Define || !index.contains(&record.concept, &record.model) {
            continue;
        }
        tally.add(record.task.as_str().to_string(), record.correct.is_yes());
    }
    MetricResult {
        groups: Task::CONDITIONED
            .iter()
            .map(|task| {
                let (correct, total) = tally.counts(task.as_str());
                (
                    task.as_str().to_string(),
                    GroupRate::potemkin(*task, correct, total),
                )
            })
            .collect(),
    }
}

/// Pulls records from every registered source and computes grouped rates.
///
/// Holds no state between calls: every query re-streams the sources and
/// rebuilds the keystone index. Stream errors propagate unchanged.
pub struct Aggregator {
    sources: Vec<DynSource>,
}

impl Aggregator {
    /// Aggregator over `sources`; the Define sources seed the keystone index.
    pub fn new(sources: Vec<DynSource>) -> Self {
        Self { sources }
    }

    /// Registered sources in registration order.
    pub fn sources(&self) -> &[DynSource] {
        &self.sources
    }

    /// Pull every record of the sources tagged with one of `tasks`.
    fn collect_records(&self, tasks: &[Task]) -> Result<Vec<Record>, PotemkinError> {
        let mut records = Vec::new();
        for source in self.sources.iter().filter(|source| tasks.contains(&source.task())) {
            for record in source.stream()? {
                records.push(record?);
            }
        }
        info!(sources = self.sources.len(), records = records.len(), "records collected");
        Ok(records)
    }

    /// Index of `(concept, model)` pairs with a correct Define record.
    pub fn build_keystone_index(&self) -> Result<KeystoneIndex, PotemkinError> {
        let mut index = KeystoneIndex::default();
        for source in self.sources.iter().filter(|source| source.task() == Task::Define) {
            for record in source.stream()? {
                let record = record?;
                if record.correct.is_yes() {
                    index.insert(record.concept, record.model);
                }
            }
        }
        info!(pairs = index.len(), "keystone index built");
        Ok(index)
    }

    /// Percentage of correct records per group over all sources.
    pub fn rate_by(&self, key: GroupKey) -> Result<MetricResult, PotemkinError> {
        let mut tally = Tally::default();
        for source in &self.sources {
            for record in source.stream()? {
                let record = record?;
                tally.add(key.group_of(&record), record.correct.is_yes());
            }
        }
        Ok(tally.into_percent_result())
    }

    /// Keystone-conditioned, chance-corrected Potemkin rate per task.
    pub fn conditioned_rate_by_task(&self) -> Result<MetricResult, PotemkinError> {
        let index = self.build_keystone_index()?;
        let records = self.collect_records(&Task::CONDITIONED)?;
        Ok(conditioned_rate_by_records(&records, &index))
    }

    /// Percentage of correct records across every source.
    pub fn overall_rate(&self) -> Result<GroupRate, PotemkinError> {
        let (mut correct, mut total) = (0usize, 0usize);
        for source in &self.sources {
            for record in source.stream()? {
                if record?.correct.is_yes() {
                    correct += 1;
                }
                total += 1;
            }
        }
        Ok(GroupRate::percent(correct, total))
    }

    /// Record count per task with shares of the total.
    pub fn record_counts(&self) -> Result<Breakdown, PotemkinError> {
        let mut counts: HashMap<GroupName, usize> = HashMap::new();
        for source in &self.sources {
            for record in source.stream()? {
                *counts.entry(record?.task.as_str().to_string()).or_default() += 1;
            }
        }
        Ok(Breakdown::from_counts(&counts))
    }

    /// Record count of one task grouped by `key`.
    pub fn breakdown(&self, task: Task, key: GroupKey) -> Result<Breakdown, PotemkinError> {
        let mut counts: HashMap<GroupName, usize> = HashMap::new();
        for record in self.collect_records(&[task])? {
            *counts.entry(key.group_of(&record)).or_default() += 1;
        }
        Ok(Breakdown::from_counts(&counts))
    }
}
