// crates/toponym-core/src/config.rs
//! File locations and query defaults.

use std::path::{Path, PathBuf};

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_COUNT: usize = 10;
pub const MAX_COUNT: usize = 100;
pub const DEFAULT_RADIUS_KM: f32 = 100.0;
pub const DEFAULT_LANGUAGE: &str = "en";

/// Number of area candidates looked up for a `name, area` query.
pub const AREA_CANDIDATES: usize = 10;

/// Where the raw tables and the snapshot live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub geonames: PathBuf,
    pub alternate_names: PathBuf,
    pub database: PathBuf,
}

impl DataPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            geonames: dir.join("allCountries.txt"),
            alternate_names: dir.join("alternateNames.txt"),
            database: dir.join("database.bin"),
        }
    }
}

impl Default for DataPaths {
    fn default() -> Self {
        Self::in_dir(DEFAULT_DATA_DIR)
    }
}

/// Defaults and bounds applied to caller supplied query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryLimits {
    pub default_count: usize,
    pub max_count: usize,
    pub default_radius_km: f32,
    pub default_language: String,
}

impl Default for QueryLimits {
    fn default() -> Self {
        Self {
            default_count: DEFAULT_COUNT,
            max_count: MAX_COUNT,
            default_radius_km: DEFAULT_RADIUS_KM,
            default_language: DEFAULT_LANGUAGE.to_owned(),
        }
    }
}

impl QueryLimits {
    /// `count` or the default, rejected outside `1..=max_count`.
    pub fn count(&self, count: Option<usize>) -> crate::Result<usize> {
        let count = count.unwrap_or(self.default_count);
        if count == 0 || count > self.max_count {
            return Err(crate::GeoError::InvalidParameter(format!(
                "count must be between 1 and {}, got {}",
                self.max_count, count
            )));
        }
        Ok(count)
    }
}
