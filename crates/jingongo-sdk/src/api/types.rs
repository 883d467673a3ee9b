//! API request and response types
//!
//! Response fields the service is contractually required to send are still
//! modelled as `Option` so that a missing field surfaces as a typed
//! [`JingongoError::Api`] naming the field instead of a JSON decode error.

use crate::error::{JingongoError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Response from `GET /auth/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhoAmIResponse {
    pub user_id: Option<String>,
}

/// Response from `POST /auth/api-key`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiKeyResponse {
    pub api_key: Option<String>,
}

/// Request body for `POST /models/upload-init`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadInitRequest {
    pub model_name: String,
    pub version: String,
    pub file_size_bytes: u64,
}

/// Response from `POST /models/upload-init`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadInitResponse {
    /// Signed storage URL accepting a single PUT
    pub upload_url: Option<String>,

    /// Identifier referencing the uploaded archive in the conversion request
    pub upload_id: Option<String>,
}

/// Full conversion payload sent to `POST /models/convert-fmu`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversionRequest {
    pub model_name: String,
    pub version: String,
    pub description: String,
    pub language: String,
    pub component_type: String,
    pub fmi_type: String,

    /// Input variable name to FMI type (e.g. "Real")
    pub input_variables: BTreeMap<String, String>,

    /// Output variable name to FMI type
    pub output_variables: BTreeMap<String, String>,

    /// Parameter name to default value
    pub parameters: BTreeMap<String, Value>,

    /// Set once the project archive has been uploaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
}

/// Response from `POST /models/convert-fmu`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResponse {
    pub job_id: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A submitted conversion job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionJob {
    pub job_id: String,
    pub model_name: String,
}

/// Server-side state of a conversion job
///
/// `COMPLETED` and `FAILED` are terminal. Any status the SDK does not know is
/// kept verbatim in [`JobStatus::Other`] and treated as still in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Running => "RUNNING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
            JobStatus::Other(s) => s,
        }
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "PENDING" => JobStatus::Pending,
            "RUNNING" => JobStatus::Running,
            "COMPLETED" => JobStatus::Completed,
            "FAILED" => JobStatus::Failed,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response from `GET /models/conversion-status/{job_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobRecord {
    /// Filled in by the SDK when the service omits it
    #[serde(default)]
    pub job_id: String,

    pub status: Option<JobStatus>,

    pub error_message: Option<String>,

    /// Any other fields the service reports (timestamps, artifact info, ...)
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobRecord {
    pub fn is_completed(&self) -> bool {
        self.status == Some(JobStatus::Completed)
    }
}

/// One entry of `GET /models?limit=N`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSummary {
    pub job_id: Option<String>,
    pub model_name: Option<String>,
    pub version: Option<String>,
    pub status: Option<JobStatus>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response from `GET /models/download/{job_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadResponse {
    /// Signed storage URL for the artifact
    pub download_url: Option<String>,

    pub fmu_filename: Option<String>,
}

/// Return a required response field, treating absent and empty alike
pub(crate) fn require(value: Option<String>, what: &str) -> Result<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(JingongoError::api(what.to_string())),
    }
}
