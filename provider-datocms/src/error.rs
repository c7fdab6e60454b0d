//! Error types for the DatoCMS provider

use bridge_traits::error::BridgeError;
use thiserror::Error;

/// Content Management API errors
#[derive(Error, Debug)]
pub enum DatoCmsError {
    /// API request returned a non-success status
    #[error("DatoCMS API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse API response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Asynchronous job finished with an error
    #[error("Job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },

    /// Job result still pending after the configured number of polls
    #[error("Job {job_id} did not finish after {attempts} polls")]
    JobTimeout { job_id: String, attempts: u32 },

    /// Bridge error
    #[error(transparent)]
    BridgeError(#[from] BridgeError),
}

/// Result type for DatoCMS operations
pub type Result<T> = std::result::Result<T, DatoCmsError>;

impl From<DatoCmsError> for BridgeError {
    fn from(error: DatoCmsError) -> Self {
        match error {
            DatoCmsError::ApiError { status: 404, message } => BridgeError::NotFound(message),
            DatoCmsError::ApiError { status, message } => BridgeError::OperationFailed(format!(
                "API error (status {}): {}",
                status, message
            )),
            DatoCmsError::ParseError(msg) => {
                BridgeError::OperationFailed(format!("Parse error: {}", msg))
            }
            DatoCmsError::JobFailed { job_id, message } => {
                BridgeError::OperationFailed(format!("Job {} failed: {}", job_id, message))
            }
            DatoCmsError::JobTimeout { job_id, attempts } => BridgeError::OperationFailed(
                format!("Job {} still pending after {} polls", job_id, attempts),
            ),
            DatoCmsError::BridgeError(e) => e,
        }
    }
}
