// crates/toponym-core/src/loader/common_io.rs
use crate::error::{GeoError, Result};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Opens a snapshot for reading, through gzip when `compact` is enabled.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoError::NotFound(format!("Snapshot not found at {}: {}", path.display(), e))
    })?;

    let reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzDecoder::new(reader)))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(reader))
    }
}

/// Creates a snapshot for writing, through gzip when `compact` is enabled.
pub fn create_stream(path: &Path) -> Result<Box<dyn Write>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let writer = BufWriter::new(File::create(path)?);

    #[cfg(feature = "compact")]
    {
        Ok(Box::new(GzEncoder::new(writer, Compression::default())))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(Box::new(writer))
    }
}

/// Read-only memory map of a raw text table.
#[cfg(feature = "builder")]
pub struct MappedText {
    map: memmap2::Mmap,
}

#[cfg(feature = "builder")]
impl MappedText {
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            GeoError::NotFound(format!("Source table not found at {}: {}", path.display(), e))
        })?;
        // SAFETY: the map is only read, and source tables are not modified
        // while a build is running.
        let map = unsafe { memmap2::Mmap::map(&file)? };
        Ok(Self { map })
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_str(&self, path: &Path) -> Result<&str> {
        std::str::from_utf8(&self.map).map_err(|e| {
            GeoError::InvalidData(format!("{} is not valid UTF-8: {}", path.display(), e))
        })
    }
}

/// `true` when `cache` exists and is not older than any of `sources`.
pub fn is_cache_fresh(cache: &Path, sources: &[&Path]) -> bool {
    let cache_time = match fs::metadata(cache).and_then(|m| m.modified()) {
        Ok(m) => m,
        Err(_) => return false,
    };
    for source in sources {
        if let Ok(source_time) = fs::metadata(source).and_then(|m| m.modified()) {
            if source_time > cache_time {
                return false;
            }
        }
    }
    true
}
