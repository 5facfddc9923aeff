//! Error types shared by the registry, checker and store layers

use thiserror::Error;

/// Failures raised by a `UrlRepository` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("database directory: {0}")]
    Io(#[from] std::io::Error),
    /// A row with the same unique key already exists
    #[error("duplicate entry: {0}")]
    Duplicate(String),
    #[error("store lock poisoned")]
    Poisoned,
    /// The blocking task running the store call panicked or was cancelled
    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Failures of the URL registry operations
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Submitted address is not an absolute http(s) URL
    #[error("invalid url '{input}': {reason}")]
    InvalidUrl { input: String, reason: String },
    #[error("url {0} not found")]
    NotFound(i64),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures of a page check
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("url {0} not found")]
    NotFound(i64),
    /// Any failure performing or reading the outbound request
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}
