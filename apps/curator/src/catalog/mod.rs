// Catalog inputs: raw per-entity records and the shared move metadata mapping.
// Both are read-only once loaded.

pub mod loader;
pub mod models;
