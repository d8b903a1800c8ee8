/// Generate and Edit sources over JSON inference bundles.
pub mod bundle;
/// Classify source over per-domain-group CSV tables.
pub mod classify;
/// Define source over a label table and loose text files.
pub mod define;
