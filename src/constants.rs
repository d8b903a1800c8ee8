/// Built-in reference label sets used by the default domain classifier.
pub mod labels {
    /// Psychological bias concepts.
    pub const PSYCHOLOGICAL_BIASES: &[&str] = &[
        "Anchoring Bias",
        "Availability Heuristic",
        "Bandwagon Effect",
        "Base Rate Fallacy",
        "Choice-Supportive Bias",
        "Confirmation Bias",
        "Dunning-Kruger Effect",
        "Endowment Effect",
        "Framing Effect",
        "Fundamental Attribution Error",
        "Gambler's Fallacy",
        "Halo Effect",
        "Hindsight Bias",
        "Illusory Correlation",
        "In-Group Bias",
        "Loss Aversion",
        "Negativity Bias",
        "Optimism Bias",
        "Recency Bias",
        "Self-Serving Bias",
        "Status Quo Bias",
        "Sunk Cost Fallacy",
    ];

    /// Game theory concepts. Generate/Edit bundles for these are discovered by
    /// directory enumeration rather than read through a label table.
    pub const GAME_THEORY: &[&str] = &[
        "Backward Induction",
        "Battle of the Sexes",
        "Best Response",
        "Chicken Game",
        "Dominant Strategy",
        "Mechanism Design",
        "Minimax",
        "Mixed Strategy",
        "Nash Equilibrium",
        "Pareto Optimality",
        "Prisoner's Dilemma",
        "Public Goods Game",
        "Schelling Point",
        "Stag Hunt",
        "Subgame Perfect Equilibrium",
        "Tit for Tat",
        "Tragedy of the Commons",
        "Ultimatum Game",
        "Zero-Sum Game",
    ];

    /// Literary technique concepts.
    pub const LITERARY_TECHNIQUES: &[&str] = &[
        "Allusion",
        "Alliteration",
        "Anaphora",
        "Assonance",
        "Ballad",
        "Enjambment",
        "Epigram",
        "Foreshadowing",
        "Free Verse",
        "Haiku",
        "Hyperbole",
        "Iambic Pentameter",
        "Irony",
        "Limerick",
        "Metaphor",
        "Onomatopoeia",
        "Oxymoron",
        "Paradox",
        "Personification",
        "Simile",
        "Slant Rhyme",
        "Sonnet",
        "Synecdoche",
        "Villanelle",
    ];
}

/// Built-in full model identifier to short display name table.
pub mod models {
    /// `(raw identifier, canonical name)` pairs in canonical-name order.
    pub const MODEL_ALIASES: &[(&str, &str)] = &[
        ("meta-llama/Llama-3.3-70B-Instruct-Turbo", "Llama-3.3"),
        ("gpt-4o", "GPT-4o"),
        ("claude-3-5-sonnet-20241022", "Claude-Sonnet"),
        ("gemini-2.0-flash-exp", "Gemini-2.0"),
        ("deepseek-ai/DeepSeek-V3", "DeepSeek-V3"),
        ("deepseek-ai/DeepSeek-R1", "DeepSeek-R1"),
        ("Qwen/Qwen2-VL-72B-Instruct", "Qwen2-VL"),
    ];
}

/// Default on-disk layout of a benchmark tree, relative to its root.
pub mod layout {
    /// Define label table.
    pub const DEFINE_LABELS: &str = "define/define_labels.csv";
    /// Root of Define content files (`<root>/<concept>/<model>/<file>`).
    pub const DEFINE_INFERENCES: &str = "define/inferences";
    /// Classify table for the psychological-bias domain group.
    pub const CLASSIFY_PSYCH: &str = "classify/psych_classify_with_cot.csv";
    /// Classify table for the literature and game-theory domain group.
    pub const CLASSIFY_OTHER: &str = "classify/literature_and_game_theory_classify_with_cot.csv";
    /// Generate label table.
    pub const GENERATE_LABELS: &str = "generate/author_labels_generate.csv";
    /// Generate task root; bundles live under its `inferences` directory.
    pub const GENERATE_ROOT: &str = "generate";
    /// Edit label table.
    pub const EDIT_LABELS: &str = "edit/author_labels_edit.csv";
    /// Edit task root; bundles live under its `inferences` directory.
    pub const EDIT_ROOT: &str = "edit";
    /// Directory below a Generate/Edit root holding `<concept>/<model>/<file>` bundles.
    pub const INFERENCES_DIR: &str = "inferences";
}

/// Label-table column names and cell conventions.
pub mod table {
    /// Concept column.
    pub const COLUMN_CONCEPT: &str = "Concept";
    /// Model column.
    pub const COLUMN_MODEL: &str = "Model";
    /// Result filename column.
    pub const COLUMN_FILE: &str = "File";
    /// Raw correctness column.
    pub const COLUMN_CORRECT: &str = "Correct";
    /// Free-text classification rationale column.
    pub const COLUMN_INFERENCE: &str = "Inference";
    /// Cell values treated as missing, alongside empty/whitespace-only cells.
    pub const NA_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "null", "NULL", "None", "<NA>"];
}

/// Inference bundle field names.
pub mod bundle {
    /// Correctness field (boolean or list of booleans).
    pub const FIELD_CORRECT: &str = "correct";
    /// Free-text payload used as record content.
    pub const FIELD_INFERENCES: &str = "inferences";
    /// Concept echo dropped from the extra payload.
    pub const FIELD_CONCEPT: &str = "concept";
}

/// Source identifiers and log messages shared by sources.
pub mod sources {
    /// Define source id.
    pub const DEFINE_SOURCE_ID: &str = "define";
    /// Classify source id.
    pub const CLASSIFY_SOURCE_ID: &str = "classify";
    /// Generate source id.
    pub const GENERATE_SOURCE_ID: &str = "generate";
    /// Edit source id.
    pub const EDIT_SOURCE_ID: &str = "edit";
    /// Log message used when an unparsable bundle is skipped.
    pub const SKIP_MALFORMED_BUNDLE_MSG: &str = "skipping malformed inference bundle";
    /// Log message used when a label row lacks a required value.
    pub const SKIP_INCOMPLETE_ROW_MSG: &str = "dropping incomplete label row";
    /// Log message used when a content file referenced by a row is absent.
    pub const SKIP_MISSING_CONTENT_MSG: &str = "content file missing";
    /// Log message used when a model result directory is absent.
    pub const SKIP_MISSING_DIR_MSG: &str = "model result directory missing";
}

/// Constants used by conditioned rate computation.
pub mod metrics {
    /// Random-guess accuracy of the binary Classify task.
    pub const CLASSIFY_CHANCE_ACCURACY: f64 = 0.5;
    /// Upper bound of any reported rate.
    pub const MAX_RATE: f64 = 100.0;
}

/// Constants used by the subject-model helpers.
pub mod subject {
    /// Tag that precedes a model's final answer.
    pub const FINAL_TAG: &str = "FINAL ANSWER:";
    /// Judge verdict for a correct answer.
    pub const VERDICT_CORRECT: &str = "correct";
    /// Judge verdict for an incorrect answer.
    pub const VERDICT_INCORRECT: &str = "incorrect";
}
