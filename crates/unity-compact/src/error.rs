//! Error types for the compaction bridge.

use thiserror::Error;

/// Errors surfaced by compact operations, the host bridge, and configuration.
///
/// Cache misses are not errors; see [`Lookup::Missing`](crate::retrieval::Lookup::Missing).
#[derive(Debug, Error)]
pub enum CompactError {
    /// The host answered but reported `success: false`.
    #[error("Tool execution failed: {0}")]
    ToolExecution(String),
    /// The host could not be reached or returned something undecodable.
    #[error("Bridge transport error: {0}")]
    Transport(String),
    /// A cached-data URI did not match `unity://<domain>/cached/<handle>`.
    #[error("Invalid cache URI: {0}")]
    InvalidUri(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CompactError {
    fn from(e: serde_json::Error) -> Self {
        CompactError::InvalidArguments(e.to_string())
    }
}
