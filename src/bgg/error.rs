//! BoardGameGeek client error types.

use thiserror::Error;

/// Result type for BoardGameGeek client operations.
pub type BggResult<T> = Result<T, BggError>;

/// Errors returned by the BoardGameGeek data client.
#[derive(Debug, Error)]
pub enum BggError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The remote service answered with a non-success status.
    #[error("{service} returned status {status}")]
    Status { service: String, status: u16 },

    /// The XML payload could not be decoded.
    #[error("invalid XML response: {0}")]
    Xml(#[from] quick_xml::DeError),

    /// The JSON payload could not be decoded.
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// BoardGameGeek reported an error message instead of data.
    #[error("{0}")]
    Api(String),

    /// A collection export was still being prepared after every retry.
    #[error("request still queued by BoardGameGeek after {attempts} attempts, try again later")]
    Queued { attempts: u32 },

    /// The requested entity does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The configured API token cannot be sent as a header.
    #[error("invalid API token: {0}")]
    InvalidToken(#[from] reqwest::header::InvalidHeaderValue),
}

impl BggError {
    /// Create a status error for the named service.
    pub fn status(service: impl Into<String>, status: u16) -> Self {
        Self::Status {
            service: service.into(),
            status,
        }
    }

    /// Create a "not found" error.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }
}
