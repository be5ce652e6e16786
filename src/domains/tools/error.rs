//! Tool-specific error types.
//!
//! Tool failures are reported to clients as ordinary text results, so the
//! `Display` output of these variants is exactly what the caller reads.

use thiserror::Error;

use crate::bgg::BggError;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Nothing matched the request.
    #[error("{0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("{0}")]
    InvalidArguments(String),

    /// A remote call failed; `context` says which one.
    #[error("{context}: {source}")]
    Remote {
        context: String,
        #[source]
        source: BggError,
    },

    /// The result could not be serialized.
    #[error("Error formatting results: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Wrap a client error with a description of the failed call.
    pub fn remote(context: impl Into<String>, source: BggError) -> Self {
        Self::Remote {
            context: context.into(),
            source,
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
