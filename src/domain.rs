//! Concept to domain classification against injected label sets.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::constants::labels::{GAME_THEORY, LITERARY_TECHNIQUES, PSYCHOLOGICAL_BIASES};
use crate::data::Domain;
use crate::types::Concept;

/// A fixed set of concept labels belonging to one domain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LabelSet {
    labels: HashSet<Concept>,
}

impl LabelSet {
    /// Build a label set from any iterable of labels. Labels are trimmed.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            labels: labels
                .into_iter()
                .map(|label| label.as_ref().trim().to_string())
                .filter(|label| !label.is_empty())
                .collect(),
        }
    }

    /// Exact membership test.
    pub fn contains(&self, concept: &str) -> bool {
        self.labels.contains(concept)
    }

    /// Labels in sorted order.
    pub fn sorted(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.sort_unstable();
        labels
    }

    /// Number of labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// True when the set has no labels.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Maps a concept label to its [`Domain`].
///
/// Sets are checked in priority order: biases, game theory, literary
/// techniques. The first match wins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainClassifier {
    /// Highest-priority set.
    #[serde(default = "default_biases")]
    pub psychological_biases: LabelSet,
    /// Concepts whose Generate/Edit bundles are enumerated from disk.
    #[serde(default = "default_game_theory")]
    pub game_theory: LabelSet,
    /// Lowest-priority set.
    #[serde(default = "default_literary")]
    pub literary_techniques: LabelSet,
}

impl DomainClassifier {
    /// Build a classifier from three substitute label sets.
    pub fn new(
        psychological_biases: LabelSet,
        game_theory: LabelSet,
        literary_techniques: LabelSet,
    ) -> Self {
        Self {
            psychological_biases,
            game_theory,
            literary_techniques,
        }
    }

    /// Classify a concept. Surrounding whitespace is ignored; never fails.
    pub fn classify(&self, concept: &str) -> Domain {
        let concept = concept.trim();
        if self.psychological_biases.contains(concept) {
            return Domain::PsychologicalBiases;
        }
        if self.game_theory.contains(concept) {
            return Domain::GameTheory;
        }
        if self.literary_techniques.contains(concept) {
            return Domain::LiteraryTechniques;
        }
        Domain::Unknown
    }

    /// True when the concept belongs to the game-theory set.
    pub fn is_game_theory(&self, concept: &str) -> bool {
        self.game_theory.contains(concept.trim())
    }

    /// Game-theory concepts in sorted order, used for directory enumeration.
    pub fn game_theory_concepts(&self) -> Vec<&str> {
        self.game_theory.sorted()
    }
}

impl Default for DomainClassifier {
    fn default() -> Self {
        Self::new(default_biases(), default_game_theory(), default_literary())
    }
}

fn default_biases() -> LabelSet {
    LabelSet::new(PSYCHOLOGICAL_BIASES)
}

fn default_game_theory() -> LabelSet {
    LabelSet::new(GAME_THEORY)
}

fn default_literary() -> LabelSet {
    LabelSet::new(LITERARY_TECHNIQUES)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_builtin_domain() {
        let classifier = DomainClassifier::default();
        assert_eq!(
            classifier.classify("Confirmation Bias"),
            Domain::PsychologicalBiases
        );
        assert_eq!(classifier.classify("Nash Equilibrium"), Domain::GameTheory);
        assert_eq!(classifier.classify("Haiku"), Domain::LiteraryTechniques);
    }

    #[test]
    fn unmatched_and_untrimmed_inputs() {
        let classifier = DomainClassifier::default();
        assert_eq!(classifier.classify("Quantum Tunnelling"), Domain::Unknown);
        assert_eq!(classifier.classify(""), Domain::Unknown);
        assert_eq!(classifier.classify("  Haiku\n"), Domain::LiteraryTechniques);
    }

    #[test]
    fn first_matching_set_wins() {
        let classifier = DomainClassifier::new(
            LabelSet::new(["Overlap"]),
            LabelSet::new(["Overlap", "Only Game"]),
            LabelSet::new(["Overlap"]),
        );
        assert_eq!(classifier.classify("Overlap"), Domain::PsychologicalBiases);
        assert_eq!(classifier.classify("Only Game"), Domain::GameTheory);
        assert!(classifier.is_game_theory(" Only Game "));
    }

    #[test]
    fn builtin_sets_are_disjoint() {
        let classifier = DomainClassifier::default();
        for label in classifier.game_theory.sorted() {
            assert!(!classifier.psychological_biases.contains(label));
            assert!(!classifier.literary_techniques.contains(label));
        }
        for label in classifier.literary_techniques.sorted() {
            assert!(!classifier.psychological_biases.contains(label));
        }
    }

    #[test]
    fn game_theory_concepts_are_sorted() {
        let classifier = DomainClassifier::new(
            LabelSet::default(),
            LabelSet::new(["Stag Hunt", "Minimax", "Chicken Game"]),
            LabelSet::default(),
        );
        assert_eq!(
            classifier.game_theory_concepts(),
            vec!["Chicken Game", "Minimax", "Stag Hunt"]
        );
    }
}
