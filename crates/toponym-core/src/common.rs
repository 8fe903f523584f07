// crates/toponym-core/src/common.rs
use serde::{Deserialize, Serialize};

/// Simple aggregate statistics for the database.
///
/// Returned by [`crate::Database::stats`]. `indexed_names` counts every
/// (name, place) entry across the main and the per-language search trees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStats {
    pub places: usize,
    pub indexed_names: usize,
    pub languages: usize,
    pub timezones: usize,
    pub quadtree_depth: usize,
}
