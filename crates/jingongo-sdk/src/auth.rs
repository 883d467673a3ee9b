//! Identity verification and credential helpers

use crate::api::{endpoints, types::require, ApiKeyResponse, WhoAmIResponse};
use crate::config::DEFAULT_API_TIMEOUT_SECS;
use crate::error::{JingongoError, Result};
use crate::transport::{decode_json, status_error, Transport};
use std::time::Duration;
use tracing::{error, info};

/// Default web portal where users sign in and find their identity token
pub const DEFAULT_PORTAL_URL: &str = "http://www.jingongo.com";

/// Confirmed identity behind an API key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: String,
}

/// Exchange the transport's credential for a confirmed identity
///
/// A 401 surfaces as [`JingongoError::Authentication`]. A successful response
/// with no `user_id` is an API error: the key was accepted but the service did
/// not say whom it belongs to.
pub async fn verify_identity(transport: &Transport) -> Result<Identity> {
    let response: WhoAmIResponse = transport.get_json(endpoints::WHOAMI).await?;

    let user_id = require(
        response.user_id,
        "API key is valid, but the backend did not return a user ID",
    )?;
    info!(user_id = %user_id, "API key successfully validated");

    Ok(Identity { user_id })
}

/// Trade a short-lived identity token for a long-lived API key
///
/// Needs no constructed client. The token travels as a bearer credential; any
/// rejection, including 401, is reported as an API error.
pub async fn generate_api_key_from_token(api_base_url: &str, id_token: &str) -> Result<String> {
    request_api_key(api_base_url, id_token, Duration::from_secs(DEFAULT_API_TIMEOUT_SECS)).await
}

async fn request_api_key(api_base_url: &str, id_token: &str, timeout: Duration) -> Result<String> {
    if api_base_url.trim().is_empty() || id_token.trim().is_empty() {
        return Err(JingongoError::validation(
            "api_base_url and id_token must be provided",
        ));
    }

    let url = endpoints::join(api_base_url, endpoints::API_KEY);
    info!("Requesting a new long-lived API key from the backend");

    let http = reqwest::Client::builder()
        .connect_timeout(timeout)
        .timeout(timeout)
        .build()
        .map_err(|e| JingongoError::api_source("Failed to build HTTP client", e))?;

    let response = http
        .post(&url)
        .bearer_auth(id_token)
        .send()
        .await
        .map_err(|e| {
            error!(error = %e, %url, "API key request failed");
            JingongoError::api_source(format!("Failed to reach {}", url), e)
        })?;

    if !response.status().is_success() {
        return Err(status_error(response, &url).await);
    }

    let body: ApiKeyResponse = decode_json(response, &url).await?;
    let api_key = require(body.api_key, "Backend did not return an API key")?;
    info!("New API key generated");

    Ok(api_key)
}

/// URL of the portal sign-in page
pub fn login_url(portal_url: Option<&str>) -> String {
    endpoints::login_url(portal_url.unwrap_or(DEFAULT_PORTAL_URL))
}

/// URL of the portal sign-up page
pub fn signup_url(portal_url: Option<&str>) -> String {
    endpoints::signup_url(portal_url.unwrap_or(DEFAULT_PORTAL_URL))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use serde_json::json;
    use wiremock::{
        matchers::{header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn test_verify_identity_returns_user() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "u-42"})))
            .mount(&server)
            .await;

        let transport = Transport::new(&ClientConfig::new(server.uri(), "k")).unwrap();
        let identity = verify_identity(&transport).await.unwrap();
        assert_eq!(identity.user_id, "u-42");
    }

    #[tokio::test]
    async fn test_verify_identity_rejected_key_is_authentication_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        let transport = Transport::new(&ClientConfig::new(server.uri(), "revoked")).unwrap();
        let err = verify_identity(&transport).await.unwrap_err();
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_verify_identity_without_user_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"email": "a@b.c"})))
            .mount(&server)
            .await;

        let transport = Transport::new(&ClientConfig::new(server.uri(), "k")).unwrap();
        let err = verify_identity(&transport).await.unwrap_err();
        assert!(matches!(err, JingongoError::Api { .. }));
        assert!(err.to_string().contains("did not return a user ID"));
    }

    #[tokio::test]
    async fn test_generate_api_key_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/api-key"))
            .and(header("Authorization", "Bearer short-lived"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"api_key": "jk_live_1"})))
            .expect(1)
            .mount(&server)
            .await;

        let key = generate_api_key_from_token(&server.uri(), "short-lived")
            .await
            .unwrap();
        assert_eq!(key, "jk_live_1");
    }

    #[tokio::test]
    async fn test_generate_api_key_rejection_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/api-key"))
            .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
            .mount(&server)
            .await;

        let err = generate_api_key_from_token(&server.uri(), "stale")
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert!(!err.is_authentication());
    }

    #[tokio::test]
    async fn test_generate_api_key_gives_up_on_silent_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/api-key"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"api_key": "late"}))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let err = request_api_key(&server.uri(), "token", Duration::from_millis(300))
            .await
            .unwrap_err();
        assert!(matches!(err, JingongoError::Api { status: None, .. }));
        assert!(err.to_string().contains("Failed to reach"));
    }

    #[tokio::test]
    async fn test_generate_api_key_requires_arguments() {
        let err = generate_api_key_from_token("", "token").await.unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_portal_urls() {
        assert_eq!(login_url(None), "http://www.jingongo.com/login");
        assert_eq!(
            signup_url(Some("https://portal.example.com")),
            "https://portal.example.com/signup"
        );
    }
}
