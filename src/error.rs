use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not serialize catalog: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("invalid map bounds {0}")]
    InvalidBounds(String),

    #[error("evaluation time {0} ms is outside the representable date range")]
    InvalidNow(i64),
}
