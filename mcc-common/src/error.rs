//! Common error types for MCC

use thiserror::Error;

/// Common result type for MCC operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the console crates
///
/// These are diagnostic errors. User-facing messages are derived from them
/// at the call site and never show the inner text.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure (connect, timeout, body read)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Service answered with a non-2xx status
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// Push-channel connect, send or receive failure
    #[error("Channel error: {0}")]
    Channel(String),

    /// Frame on the push channel did not match the wire protocol
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// JSON encode/decode error (wraps serde_json::Error)
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Token storage could not be read or written
    #[error("Storage error: {0}")]
    Storage(String),
}
