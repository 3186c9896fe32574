//! Client error types.

/// Errors that can occur when using the safedl client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// HTTP request failed (connection, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server returned an error response not covered by a typed variant.
    #[error("API error: {code} - {message}")]
    Api {
        /// Error code.
        code: String,
        /// Error message.
        message: String,
        /// HTTP status code.
        status: u16,
    },

    /// The server rejected the input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Record or column not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// The server failed to read or write its store.
    #[error("storage error: {0}")]
    Storage(String),

    /// Reading or writing the local configuration cache failed.
    #[error("cache error: {0}")]
    Cache(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error, such as an unusable base URL.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ClientError {
    /// Whether the server could not answer: transport failures and 5xx responses.
    ///
    /// Rejections (validation, not found, unauthorized) are not unavailability.
    #[must_use]
    pub fn is_unavailable(&self) -> bool {
        match self {
            Self::Http(_) | Self::Storage(_) => true,
            Self::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
