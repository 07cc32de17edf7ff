//! Error types for the backend client
//!
//! Classifies every backend failure as one of:
//! - transport failures (network unreachable, timeouts)
//! - rejections (non-2xx status)
//! - malformed payloads (missing or mistyped fields)
//! - local I/O while preparing uploads
//! - invalid client configuration

use std::path::PathBuf;

/// Backend client error
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Request never produced a response
    #[error("transport failure on {endpoint}: {message}")]
    Transport {
        /// Endpoint path
        endpoint: &'static str,
        /// Underlying error text
        message: String,
    },

    /// Backend answered with a non-success status
    #[error("{endpoint} rejected with status {status}: {body}")]
    Status {
        /// Endpoint path
        endpoint: &'static str,
        /// HTTP status code
        status: u16,
        /// Response body, usually a `{"detail": ...}` object
        body: String,
    },

    /// Response body did not match the expected shape
    #[error("malformed {endpoint} response: {source}")]
    Decode {
        /// Endpoint path
        endpoint: &'static str,
        /// JSON decoding error
        #[source]
        source: serde_json::Error,
    },

    /// Local file could not be read
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// File path
        path: PathBuf,
        /// I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration error
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl BackendError {
    /// Transport failure for `endpoint`
    #[inline]
    pub fn transport(endpoint: &'static str, message: impl Into<String>) -> Self {
        Self::Transport {
            endpoint,
            message: message.into(),
        }
    }

    /// Check if the request failed before a response arrived
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Check if the backend rejected the request
    #[inline]
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Status { .. })
    }

    /// Check if the response payload was malformed
    #[inline]
    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
