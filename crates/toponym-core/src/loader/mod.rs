// crates/toponym-core/src/loader/mod.rs

//! # Data Loader
//!
//! Parses the raw GeoNames tables and moves snapshots between disk and
//! memory. Snapshots are bincode encoded, gzip wrapped when the `compact`
//! feature is enabled.

use crate::database::Database;
use crate::error::Result;
use bincode::Options;
use std::io::{Read, Write};
use std::path::Path;
use std::time::Instant;
use tracing::info;

pub mod alternate;
pub mod common_io;
pub mod geonames;
mod fields;

#[cfg(feature = "builder")]
pub mod builder;

pub use alternate::AlternateNames;
pub use geonames::Gazetteer;

/// Upper bound for a decoded snapshot.
pub const SNAPSHOT_LIMIT: u64 = 16 * 1024 * 1024 * 1024;

fn snapshot_options() -> impl Options {
    bincode::DefaultOptions::new()
        .with_limit(SNAPSHOT_LIMIT)
        .allow_trailing_bytes()
}

impl Database {
    /// **Standard Loader:** reads a snapshot written by [`Database::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let started = Instant::now();
        info!(path = %path.display(), "snapshot: loading");

        let mut stream = common_io::open_stream(path)?;
        let mut data = Vec::new();
        stream.read_to_end(&mut data)?;
        let db = Self::from_bytes(&data)?;

        info!(
            places = db.len(),
            bytes = data.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot: loaded"
        );
        Ok(db)
    }

    /// Decodes an uncompressed snapshot.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let db: Database = snapshot_options().deserialize(data)?;
        db.validate()?;
        Ok(db)
    }

    /// Encodes the database without compression.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(snapshot_options().serialize(self)?)
    }

    /// Writes a snapshot to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let started = Instant::now();

        let mut stream = common_io::create_stream(path)?;
        snapshot_options().serialize_into(&mut stream, self)?;
        stream.flush()?;
        drop(stream);

        let bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);
        info!(
            path = %path.display(),
            bytes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "snapshot: written"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GeoError;

    #[test]
    fn bytes_round_trip() {
        let text = "2657946\tWyhlen\tWyhlen\tWyhlen\t47.54729\t7.69331\tP\tPPLX\tDE\t\t01\t083\t08336\t08336105\t0\t\t269\tEurope/Berlin\t2020-11-12\n";
        let gazetteer = Gazetteer::parse(text, AlternateNames::default()).unwrap();
        let db = Database::build(gazetteer);

        let bytes = db.to_bytes().unwrap();
        let decoded = Database::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, db);
    }

    #[test]
    fn garbage_is_rejected() {
        let err = Database::from_bytes(&[0xff, 0x01, 0x02]).unwrap_err();
        assert!(matches!(err, GeoError::Bincode(_)));
    }
}
