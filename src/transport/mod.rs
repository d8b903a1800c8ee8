/// Inference bundle parsing.
pub mod bundle;
/// Filesystem helpers for content layouts.
pub mod fs;
/// CSV label tables.
pub mod table;
