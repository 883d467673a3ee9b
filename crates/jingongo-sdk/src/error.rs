//! Error types for the Jingongo SDK
//!
//! A flat set of failure kinds. Every pipeline stage either returns a fully
//! valid result or one of these; nothing is retried or swallowed.

use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, JingongoError>;

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error type for all SDK operations
#[derive(Error, Debug)]
pub enum JingongoError {
    /// Caller misuse detected before any network call
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The service rejected the credential (HTTP 401)
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Transport, protocol or response-contract failure
    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
        #[source]
        source: Option<BoxError>,
    },

    /// The conversion job reached the FAILED state
    #[error("FMU cloud conversion failed: {0}")]
    Conversion(String),

    /// A caller-supplied polling bound was reached before a terminal state
    #[error("Gave up waiting for job '{job_id}' after {attempts} status checks")]
    PollingTimedOut { job_id: String, attempts: u32 },

    /// Local file system failure
    #[error("File operation failed: {0}")]
    Io(#[from] std::io::Error),
}

impl JingongoError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an authentication error
    pub fn authentication(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an API error with no status or underlying cause
    pub fn api(msg: impl Into<String>) -> Self {
        Self::Api {
            message: msg.into(),
            status: None,
            source: None,
        }
    }

    /// Create an API error for a non-success HTTP status
    pub fn api_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Api {
            message: msg.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Create an API error wrapping an underlying cause
    pub fn api_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Api {
            message: msg.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a conversion failure
    pub fn conversion(msg: impl Into<String>) -> Self {
        Self::Conversion(msg.into())
    }

    /// HTTP status carried by an API error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => *status,
            Self::Authentication(_) => Some(401),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
