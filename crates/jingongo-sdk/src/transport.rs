//! Authenticated JSON transport
//!
//! Every call carries the `X-API-Key` header and is attempted exactly once.
//! Failures are mapped onto [`JingongoError`]:
//!
//! - HTTP 401 becomes [`JingongoError::Authentication`]
//! - any other non-success status becomes [`JingongoError::Api`] with the
//!   status code and response body
//! - network failures and malformed bodies become [`JingongoError::Api`]
//!   wrapping the cause

use crate::api::endpoints;
use crate::config::ClientConfig;
use crate::error::{JingongoError, Result};
use reqwest::{Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, error};

/// Header carrying the long-lived API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Stateless request/response exchange with the Jingongo API
///
/// The credential is attached per request rather than stored as a default
/// header, so the same underlying HTTP client also serves the signed-URL
/// transfers that must not carry it.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        // No client-wide deadline: it would also cap signed-URL transfers
        let http = reqwest::Client::builder()
            .connect_timeout(config.timeout())
            .build()
            .map_err(|e| JingongoError::api_source("Failed to build HTTP client", e))?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            api_key: config.api_key().to_string(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Plain HTTP client for signed-URL transfers
    ///
    /// Only connecting is bounded; a body that keeps flowing is never cut off.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.request::<(), T>(Method::GET, endpoint, None).await
    }

    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.request(Method::POST, endpoint, Some(body)).await
    }

    /// Send one authenticated request and decode the JSON response
    pub async fn request<B, T>(&self, method: Method, endpoint: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = endpoints::join(&self.base_url, endpoint);
        debug!(%method, %url, "Sending API request");

        let mut builder = self
            .http
            .request(method, &url)
            .timeout(self.timeout)
            .header(API_KEY_HEADER, &self.api_key);
        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = %e, %url, "Error during request");
            JingongoError::api_source(
                format!("Failed to communicate with the Jingongo API at {}", url),
                e,
            )
        })?;

        decode_json(check_status(response, &url).await?, &url).await
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Map a non-success response onto the error taxonomy
///
/// 401 is an authentication failure; everything else keeps its status and
/// body text in an API error.
pub(crate) async fn check_status(response: Response, url: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::UNAUTHORIZED {
        error!(%url, "API key authentication failed");
        return Err(JingongoError::authentication(
            "The provided API key is invalid or has been revoked",
        ));
    }

    Err(status_error(response, url).await)
}

/// Build an API error from a non-success response, consuming its body
pub(crate) async fn status_error(response: Response, url: &str) -> JingongoError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    error!(status = status.as_u16(), body = %body, %url, "HTTP error");
    JingongoError::api_status(
        status.as_u16(),
        format!("API request to {} failed: {} - {}", url, status.as_u16(), body),
    )
}

pub(crate) async fn decode_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let bytes = response.bytes().await.map_err(|e| {
        error!(error = %e, %url, "Failed to read response body");
        JingongoError::api_source(format!("Failed to read response from {}", url), e)
    })?;

    serde_json::from_slice(&bytes).map_err(|e| {
        error!(error = %e, %url, "Malformed response body");
        JingongoError::api_source(format!("Malformed JSON response from {}", url), e)
    })
}
