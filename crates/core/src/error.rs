//! Unified error types for readthru.
//!
//! Every variant carries a stable label so an outage is never mistaken for
//! an empty result.

use rmcp::model::{ErrorCode, ErrorData as McpError};
use tokio_rusqlite::rusqlite;

/// Unified error types for the cache-aside layer and its stores.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., a filter that is not valid JSON).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// The document store could not answer a query.
    #[error("STORE_ERROR: {0}")]
    Store(String),

    /// The cache store could not complete an operation.
    #[error("CACHE_ERROR: {0}")]
    Cache(String),

    /// SQLite operation failed.
    #[error("DATABASE_ERROR: {0}")]
    Database(tokio_rusqlite::Error),

    /// Migration failed to apply.
    #[error("MIGRATION_FAILED: {0}")]
    MigrationFailed(String),

    /// A result document could not be encoded for the cache.
    #[error("ENCODE_FAILED: {0}")]
    Encode(String),

    /// A payload could not be decoded as a result document.
    #[error("DECODE_FAILED: {0}")]
    Decode(String),
}

impl From<tokio_rusqlite::Error<Error>> for Error {
    fn from(err: tokio_rusqlite::Error<Error>) -> Self {
        match err {
            tokio_rusqlite::Error::Error(e) => e,
            tokio_rusqlite::Error::ConnectionClosed => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
            tokio_rusqlite::Error::Close(c) => Error::Database(tokio_rusqlite::Error::Close(c)),
            _ => Error::Database(tokio_rusqlite::Error::ConnectionClosed),
        }
    }
}

impl From<tokio_rusqlite::Error<rusqlite::Error>> for Error {
    fn from(err: tokio_rusqlite::Error<rusqlite::Error>) -> Self {
        Error::Database(err)
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Database(tokio_rusqlite::Error::Error(err))
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let (code, message) = match &err {
            Error::InvalidInput(msg) => (-32602, msg.clone()),
            Error::Store(msg) => (-32020, msg.clone()),
            Error::Cache(msg) => (-32021, msg.clone()),
            Error::Database(e) => (-32022, e.to_string()),
            Error::MigrationFailed(msg) => (-32023, msg.clone()),
            Error::Encode(msg) => (-32024, msg.clone()),
            Error::Decode(msg) => (-32025, msg.clone()),
        };

        McpError { code: ErrorCode(code), message: message.into(), data: None }
    }
}
