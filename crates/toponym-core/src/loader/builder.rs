// crates/toponym-core/src/loader/builder.rs
#![cfg(feature = "builder")]

use super::common_io::{self, MappedText};
use super::{AlternateNames, Gazetteer};
use crate::config::DataPaths;
use crate::database::Database;
use crate::error::Result;
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Parses both raw tables into a [`Gazetteer`].
pub fn read_gazetteer(geonames: &Path, alternate_names: &Path) -> Result<Gazetteer> {
    let alternate_text = MappedText::open(alternate_names)?;
    info!(
        path = %alternate_names.display(),
        bytes = alternate_text.len(),
        "mapped alternate names"
    );
    let alternate = AlternateNames::parse(alternate_text.as_str(alternate_names)?)?;
    drop(alternate_text);

    let geonames_text = MappedText::open(geonames)?;
    info!(
        path = %geonames.display(),
        bytes = geonames_text.len(),
        "mapped geonames"
    );
    Gazetteer::parse(geonames_text.as_str(geonames)?, alternate)
}

impl Database {
    /// Builds a database from the raw tables named in `paths`.
    pub fn build_from_files(paths: &DataPaths) -> Result<Self> {
        let started = Instant::now();
        info!("create new database");
        let gazetteer = read_gazetteer(&paths.geonames, &paths.alternate_names)?;
        let db = Self::build(gazetteer);
        info!(
            places = db.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "database built"
        );
        Ok(db)
    }

    /// **Smart Load:** uses the snapshot when it is newer than both source
    /// tables, otherwise rebuilds from text and writes a fresh snapshot.
    pub fn load_or_create(paths: &DataPaths) -> Result<Self> {
        let sources = [paths.geonames.as_path(), paths.alternate_names.as_path()];
        if common_io::is_cache_fresh(&paths.database, &sources) {
            match Self::load(&paths.database) {
                Ok(db) => return Ok(db),
                Err(e) => warn!(error = %e, "snapshot unreadable, rebuilding"),
            }
        }

        let db = Self::build_from_files(paths)?;
        db.save(&paths.database)?;
        Ok(db)
    }
}
