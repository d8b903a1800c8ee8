/// Tested concept label, trimmed of surrounding whitespace.
/// Examples: `Haiku`, `Prisoner's Dilemma`, `Confirmation Bias`
pub type Concept = String;
/// Model identifier, either raw from a label table or canonicalized.
/// Examples: `gpt-4o` (raw), `GPT-4o` (canonical), `deepseek-ai/DeepSeek-R1`
pub type ModelName = String;
/// Identifier for the source that produced a record.
/// Examples: `define`, `classify`, `generate`, `edit`
pub type SourceId = String;
/// File path strings recorded for traceability.
/// Example: `generate/inferences/Haiku/GPT-4o/0.json`
pub type PathString = String;
/// Column header in a label table.
/// Examples: `Concept`, `Model`, `File`, `Correct`, `Inference`
pub type ColumnName = String;
/// Rendered group key for metric results.
/// Examples: `Game Theory`, `GPT-4o`, `Classify`
pub type GroupName = String;
/// Source-specific fields preserved verbatim on a record.
pub type ExtraFields = serde_json::Map<String, serde_json::Value>;
