//! Domain error types.

use thiserror::Error;

/// Run orchestration errors.
///
/// Status unavailability and stopping an unknown workflow are not errors:
/// they come back as unknown / last-known statuses.
#[derive(Debug, Error)]
pub enum RunError {
    /// The request was rejected before reaching the engine.
    #[error("Invalid run request: {0}")]
    InvalidRequest(String),

    /// The engine rejected the workflow or could not be reached at creation.
    #[error("Workflow submission failed (status {status:?}): {body}")]
    Submission {
        /// HTTP status from the engine, when it answered.
        status: Option<u16>,
        /// Response body or transport error message.
        body: String,
    },

    /// Engine call failed.
    #[error("Engine error: {0}")]
    Engine(#[from] runplane_client::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] runplane_config::ConfigError),
}

impl RunError {
    pub(crate) fn submission(err: &runplane_client::Error) -> Self {
        RunError::Submission {
            status: err.status_code(),
            body: err.body(),
        }
    }
}

/// Result type for domain operations.
pub type Result<T> = std::result::Result<T, RunError>;
