// Error type shared by the builder, the renderer and the ingestion layer.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    /// A room index, door index or room count outside its bound.
    #[error("{what}: {value} is out of range (expected 0..{bound})")]
    OutOfRange {
        what: String,
        value: i64,
        bound: i64,
    },

    /// A record that could not be turned into a connection, plan or row.
    #[error("malformed record at {location}: {reason}")]
    MalformedRecord { location: String, reason: String },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MapError {
    pub fn out_of_range(what: impl Into<String>, value: i64, bound: i64) -> Self {
        MapError::OutOfRange {
            what: what.into(),
            value,
            bound,
        }
    }

    pub fn malformed(location: impl Into<String>, reason: impl Into<String>) -> Self {
        MapError::MalformedRecord {
            location: location.into(),
            reason: reason.into(),
        }
    }
}
