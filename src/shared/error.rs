//! Cache Error Types
//!
//! Centralized error handling for the part cache.
//!
//! Every failure in this crate is surfaced to the immediate caller as an
//! `Err(CacheError)`. Nothing here retries, and nothing logs an error and
//! carries on.

use crate::infrastructure::http::{Operation, RateLimit};

/// Result alias used throughout the crate.
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache error type
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// The repository has no endpoint configured for the requested operation.
    #[error("Unsupported operation: {part} repository has no `{operation}` endpoint")]
    UnsupportedOperation {
        operation: Operation,
        part: &'static str,
    },

    /// The part is not in the lifecycle state the operation requires.
    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    /// No stored value and no computed resolver for the attribute.
    #[error("Attribute not found: {part}.{attribute}")]
    AttributeNotFound {
        part: &'static str,
        attribute: String,
    },

    /// The HTTP collaborator reported a transport (`status: None`) or status error.
    #[error("Remote request failed ({}): {body}", status.map_or_else(|| "transport".to_string(), |s| s.to_string()))]
    RemoteRequestFailed { status: Option<u16>, body: String },

    /// The remote API answered 429.
    #[error("{0}")]
    RateLimited(RateLimit),

    /// Endpoint templates or settings are inconsistent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The remote answered with a shape this layer cannot hydrate.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CacheError {
    /// Build an `UnsupportedOperation` for kind `part`.
    pub fn unsupported(operation: Operation, part: &'static str) -> Self {
        Self::UnsupportedOperation { operation, part }
    }

    /// Whether a caller could reasonably try the same request again later.
    pub fn is_retryable(&self) -> bool {
        match self {
            CacheError::RateLimited(_) => true,
            CacheError::RemoteRequestFailed { status: Some(s), .. } => *s >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            CacheError::RemoteRequestFailed { status, .. } => *status,
            CacheError::RateLimited(_) => Some(429),
            _ => None,
        }
    }
}
