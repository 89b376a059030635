//! Error kinds for fetching, caching and extracting current-events pages.
//!
//! Transport failures are [`NetworkError`]s. The source cache absorbs them
//! whenever a stale entry exists and only surfaces a [`FetchError`] when it
//! has nothing to fall back to. [`MalformedDocumentError`] aborts assembly of
//! an edition. Record extraction itself never fails.

use thiserror::Error;

/// Failure of the transport that retrieves the raw document.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("Server responded with status {0}")]
    Status(u16),

    /// The response arrived but did not contain the expected payload.
    #[error("Unexpected response body: {0}")]
    Body(String),
}

/// Raised by the source cache when a fetch failed and no stored value exists.
#[derive(Debug, Error)]
#[error("Failed to fetch '{key}' and no cached copy is available: {source}")]
pub struct FetchError {
    pub key: String,
    #[source]
    pub source: NetworkError,
}

/// An expected region or element is absent from the document.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MalformedDocumentError {
    /// There is no day region at the requested index.
    #[error("No day region at index {day_index}")]
    MissingRegion { day_index: usize },

    /// A required element is missing inside an otherwise located region.
    #[error("Missing required element: {element} in {context}")]
    MissingElement { element: String, context: String },
}

/// Invalid or unreadable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },

    /// A CSS selector in the config does not parse.
    #[error("Invalid selector for {field}: '{selector}' ({reason})")]
    Selector {
        field: &'static str,
        selector: String,
        reason: String,
    },
}

/// I/O failure of a persistent cache store.
#[derive(Debug, Error)]
pub enum CacheStoreError {
    #[error("Cache store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache entry is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}
