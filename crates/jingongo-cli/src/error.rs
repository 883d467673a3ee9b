//! Error types for the Jingongo CLI
//!
//! SDK failures are translated into messages that tell the user what to try
//! next.

use jingongo::JingongoError;
use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;

/// User-facing error type for CLI operations
#[derive(Error, Debug)]
pub enum CliError {
    /// API URL or key not supplied
    #[error("Configuration error: {0}. Set JINGONGO_API_BASE_URL and JINGONGO_API_KEY (or pass --api-url and --api-key).")]
    Config(String),

    /// Bad command-line input or project contents
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The service rejected the API key
    #[error("Authentication failed: {0}. Run 'jingongo generate-key' to obtain a new API key.")]
    Authentication(String),

    /// API server communication failed
    #[error("Server error: {0}. Check the API URL and try 'jingongo health'.")]
    Api(String),

    /// The cloud conversion job failed
    #[error("FMU conversion failed: {0}. Check the model sources and .jingongo.yml, then resubmit.")]
    ConversionFailed(String),

    /// Gave up waiting for a job
    #[error("Stopped waiting for job '{job_id}' after {attempts} status checks. Check on it later with 'jingongo status {job_id}'.")]
    StillRunning { job_id: String, attempts: u32 },

    /// File system operation failed
    #[error("File operation failed: {0}. Check file permissions and disk space.")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<JingongoError> for CliError {
    fn from(err: JingongoError) -> Self {
        match err {
            JingongoError::Validation(msg) => Self::InvalidInput(msg),
            JingongoError::Authentication(msg) => Self::Authentication(msg),
            JingongoError::Conversion(msg) => Self::ConversionFailed(msg),
            JingongoError::PollingTimedOut { job_id, attempts } => {
                Self::StillRunning { job_id, attempts }
            }
            JingongoError::Io(e) => Self::Io(e),
            api @ JingongoError::Api { .. } => Self::Api(error_chain(&api)),
        }
    }
}

/// Render an error with its causes, `outer: inner: root`
fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut rendered = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        rendered.push_str(": ");
        rendered.push_str(&cause.to_string());
        source = cause.source();
    }
    rendered
}
