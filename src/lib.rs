//! Workspace crate for `toponym-core` and `toponym-cli`.
//!
//! Re-exports the core library so the demos can depend on a single crate.
pub use toponym_core::*;
