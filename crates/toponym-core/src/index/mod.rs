// crates/toponym-core/src/index/mod.rs
//! In-memory query structures built from the place table.

pub mod geo_tree;
pub mod search_tree;

pub use geo_tree::GeoTree;
pub use search_tree::{SearchTree, SearchTreeBuilder, INITIAL_FACTOR};
