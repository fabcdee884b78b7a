//! Error types for the Compute Engine REST client.

use thiserror::Error;

/// Errors raised by the Compute Engine REST client.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum GceError {
    /// Raised when the client configuration is incomplete.
    #[error("configuration error: {0}")]
    Config(String),
    /// Raised when the HTTP exchange cannot be completed (connectivity,
    /// TLS, timeouts).
    #[error("transport error: {message}")]
    Transport {
        /// Message from the HTTP stack.
        message: String,
    },
    /// Raised when the service answers with a non-success status.
    #[error("compute API returned HTTP {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the response body.
        message: String,
    },
    /// Raised when a response body cannot be decoded.
    #[error("failed to decode API response: {message}")]
    Decode {
        /// Decoder error message.
        message: String,
    },
}

impl From<reqwest::Error> for GceError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            Self::Decode {
                message: value.to_string(),
            }
        } else {
            Self::Transport {
                message: value.to_string(),
            }
        }
    }
}
