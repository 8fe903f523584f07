// crates/toponym-core/src/lib.rs

//! # toponym-core
//!
//! A gazetteer search engine over GeoNames data.
//!
//! The raw `allCountries.txt` and `alternateNames.txt` tables are parsed into
//! [`PlaceRecord`]s, from which two query structures are built: a fuzzy
//! prefix [`index::SearchTree`] over folded names (one main tree plus one per
//! language) and a static [`index::GeoTree`] quadtree for nearest neighbour
//! lookups. Everything lives in one immutable [`Database`] which can be
//! persisted as a snapshot and shared between threads.
//!
//! ```no_run
//! use toponym_core::{DataPaths, Database, QueryLimits, SearchOptions};
//!
//! let db = Database::load_or_create(&DataPaths::default())?;
//! for place in db.search_places(&SearchOptions::new("Berlin").language("de"), &QueryLimits::default())? {
//!     println!("{} ({}) {}", place.name, place.country_code, place.score);
//! }
//! # Ok::<(), toponym_core::GeoError>(())
//! ```

pub mod common;
pub mod config;
pub mod database;
pub mod error;
pub mod index;
pub mod intern;
pub mod loader;
pub mod model;
pub mod query;
pub mod queue;
pub mod text;
pub mod traits;

// Re-exports
pub use crate::common::DbStats;
pub use crate::config::{DataPaths, QueryLimits};
pub use crate::database::{Database, SharedDatabase};
pub use crate::error::{GeoError, Result};
pub use crate::loader::{AlternateNames, Gazetteer};
pub use crate::model::{PlaceId, PlaceRecord, PlaceView};
pub use crate::query::{ProximityOptions, SearchOptions};
pub use crate::queue::Scored;
pub use crate::text::fold_key;
