//! Client error types.

use thiserror::Error;

/// Client error type.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed (connection, TLS, timeout, body decoding).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Engine returned an error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the body, or the status line.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Check if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_)) || matches!(self, Error::Api { status: 404, .. })
    }

    /// Check if this is a server error.
    pub fn is_server_error(&self) -> bool {
        matches!(self, Error::Api { status, .. } if *status >= 500)
    }

    /// HTTP status carried by the error, if the engine answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Api { status, .. } => Some(*status),
            Error::NotFound(_) => Some(404),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Response body carried by the error, or its message.
    pub fn body(&self) -> String {
        match self {
            Error::Api { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the engine (gRPC gateway shape).
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    #[serde(default)]
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_detection() {
        assert!(Error::NotFound("wf".into()).is_not_found());
        let api = Error::Api {
            status: 404,
            message: "gone".into(),
            body: "{}".into(),
        };
        assert!(api.is_not_found());
        assert!(!Error::Config("x".into()).is_not_found());
    }

    #[test]
    fn test_status_and_body() {
        let err = Error::Api {
            status: 503,
            message: "unavailable".into(),
            body: "{\"message\":\"unavailable\"}".into(),
        };
        assert!(err.is_server_error());
        assert_eq!(err.status_code(), Some(503));
        assert!(err.body().contains("unavailable"));
        assert_eq!(Error::NotFound("x".into()).status_code(), Some(404));
        assert_eq!(Error::Config("x".into()).status_code(), None);
    }
}
