//! API endpoint paths
//!
//! Paths are relative to the service base URL; [`join`] builds the full URL.

/// Identity lookup for the current API key
pub const WHOAMI: &str = "/auth/me";

/// Long-lived API key issuance from a short-lived identity token
pub const API_KEY: &str = "/auth/api-key";

/// Service health
pub const HEALTH: &str = "/health";

/// Signed upload URL request
pub const UPLOAD_INIT: &str = "/models/upload-init";

/// Conversion job submission
pub const CONVERT_FMU: &str = "/models/convert-fmu";

/// Build the model listing path
pub fn models(limit: u32) -> String {
    format!("/models?limit={}", limit)
}

/// Build the conversion status path for a job
pub fn conversion_status(job_id: &str) -> String {
    format!("/models/conversion-status/{}", job_id)
}

/// Build the download lookup path for a job
pub fn download(job_id: &str) -> String {
    format!("/models/download/{}", job_id)
}

/// Join a base URL and an endpoint path
pub fn join(base_url: &str, endpoint: &str) -> String {
    format!("{}{}", base_url.trim_end_matches('/'), endpoint)
}

/// Build the portal login page URL
pub fn login_url(portal_url: &str) -> String {
    join(portal_url, "/login")
}

/// Build the portal signup page URL
pub fn signup_url(portal_url: &str) -> String {
    join(portal_url, "/signup")
}
