use std::path::PathBuf;

use thiserror::Error;

use crate::models::SourceFormat;

/// Errors raised while fetching and normalizing ratings data.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The server answered with a non-success status.
    #[error("Failed to fetch {url}: HTTP {status}")]
    FetchFailure { url: String, status: u16 },

    /// The request never produced a response.
    #[error("Failed to fetch {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local data file could not be read.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The build lacks a parser the source needs.
    #[cfg_attr(feature = "xlsx", allow(dead_code))]
    #[error("Missing capability: {0}")]
    MissingCapability(&'static str),

    /// The document was fetched but could not be understood.
    #[error("Malformed data: {0}")]
    MalformedData(String),

    /// Both source formats failed; the first error belongs to the preferred one.
    #[error("Failed to load ratings ({preferred}: {first}; {}: {second})", .preferred.alternate())]
    AllFormatsFailed {
        preferred: SourceFormat,
        first: Box<LoadError>,
        second: Box<LoadError>,
    },
}

impl From<serde_json::Error> for LoadError {
    fn from(err: serde_json::Error) -> Self {
        LoadError::MalformedData(err.to_string())
    }
}
