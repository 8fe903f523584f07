// crates/toponym-core/src/error.rs
use thiserror::Error;

use crate::model::PlaceId;

/// Errors produced while building, persisting or querying the database.
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Snapshot encoding error: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A source row that cannot be parsed. Aborts the build.
    #[error("Malformed line {line} in {file}: {message}")]
    MalformedLine {
        file: &'static str,
        line: usize,
        message: String,
    },

    /// An index refers to a place that is not in the record map.
    #[error("Index refers to place {0} which is missing from the record map")]
    InconsistentIndex(PlaceId),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

pub type Result<T> = std::result::Result<T, GeoError>;
