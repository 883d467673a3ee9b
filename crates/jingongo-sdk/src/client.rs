//! Session facade over the conversion pipeline
//!
//! A [`Client`] is only handed out after its API key has been confirmed by
//! the service. It holds no mutable state, so clones can be shared freely
//! across tasks.

use crate::api::{endpoints, ConversionJob, ConversionResponse, JobRecord, ModelSummary};
use crate::auth::{verify_identity, Identity};
use crate::config::ClientConfig;
use crate::download::{self, ProgressTarget};
use crate::error::{JingongoError, Result};
use crate::packager::{self, ensure_project_dir};
use crate::poller::{self, PollConfig};
use crate::project::{load_project_config, resolve_request, ConversionOptions};
use crate::transport::Transport;
use crate::upload::upload_archive;
use indicatif::ProgressBar;
use jingongo_common::logging::{init_logging, LogConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};

/// Authenticated session with the Jingongo API
#[derive(Debug, Clone)]
pub struct Client {
    transport: Transport,
    identity: Identity,
    config: ClientConfig,
}

impl Client {
    /// Validate `config`, then confirm the API key with the service
    ///
    /// Missing settings fail with [`JingongoError::Validation`] before any
    /// request is made. A rejected key fails with
    /// [`JingongoError::Authentication`].
    pub async fn connect(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        if config.is_verbose() {
            install_console_logging();
        }

        let transport = Transport::new(&config)?;
        info!(base_url = %transport.base_url(), "Connecting to the Jingongo API");
        let identity = verify_identity(&transport).await?;

        Ok(Self {
            transport,
            identity,
            config,
        })
    }

    /// Connect using [`ClientConfig::from_env`]
    pub async fn from_env() -> Result<Self> {
        Self::connect(ClientConfig::from_env()).await
    }

    pub fn user_id(&self) -> &str {
        &self.identity.user_id
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn base_url(&self) -> &str {
        self.transport.base_url()
    }

    /// Ask the service whether it is up
    pub async fn health_check(&self) -> Result<Value> {
        self.transport.get_json(endpoints::HEALTH).await
    }

    /// Most recent conversion jobs of the calling user
    pub async fn list_models(&self, limit: u32) -> Result<Vec<ModelSummary>> {
        let models: Vec<ModelSummary> = self.transport.get_json(&endpoints::models(limit)).await?;
        debug!(count = models.len(), "Fetched model list");
        Ok(models)
    }

    /// Current state of a conversion job
    pub async fn get_conversion_status(&self, job_id: &str) -> Result<JobRecord> {
        poller::fetch_status(&self.transport, job_id).await
    }

    /// Package a project, upload it and start a cloud conversion
    ///
    /// The request is built from built-in defaults, then the project's
    /// `.jingongo.yml`, then `options`; later sources win. Returns as soon as
    /// the service has accepted the job.
    #[instrument(skip(self, options), fields(project = %project_dir.display()))]
    pub async fn submit_conversion(
        &self,
        project_dir: &Path,
        options: &ConversionOptions,
    ) -> Result<ConversionJob> {
        ensure_project_dir(project_dir)?;

        let file_config = load_project_config(project_dir)?;
        let mut request = resolve_request(file_config.as_ref(), options);
        info!(
            model_name = %request.model_name,
            version = %request.version,
            "Submitting model for cloud conversion"
        );

        let archive = packager::package(project_dir).await?;
        let upload_id =
            upload_archive(&self.transport, &archive, &request.model_name, &request.version).await?;
        drop(archive);

        request.upload_id = Some(upload_id);
        let response: ConversionResponse = self
            .transport
            .post_json(endpoints::CONVERT_FMU, &request)
            .await?;

        let job_id = match response.job_id.filter(|id| !id.is_empty()) {
            Some(id) => id,
            None => {
                error!("Conversion request accepted without a job ID");
                return Err(JingongoError::api(
                    "API did not return a job ID for the conversion request",
                ));
            }
        };
        info!(job_id = %job_id, "FMU conversion job started");

        Ok(ConversionJob {
            job_id,
            model_name: request.model_name,
        })
    }

    /// Poll a job until it completes or fails
    pub async fn await_completion(&self, job_id: &str, poll: &PollConfig) -> Result<JobRecord> {
        info!(job_id, interval_secs = poll.interval.as_secs(), "Waiting for conversion");
        poller::poll_until_terminal(job_id, poll, || {
            poller::fetch_status(&self.transport, job_id)
        })
        .await
    }

    /// Submit a conversion and wait for its outcome
    pub async fn convert(
        &self,
        project_dir: &Path,
        options: &ConversionOptions,
        poll: &PollConfig,
    ) -> Result<JobRecord> {
        let job = self.submit_conversion(project_dir, options).await?;
        self.await_completion(&job.job_id, poll).await
    }

    /// Download the FMU of a completed job into `destination_dir`
    ///
    /// Draws a terminal progress bar when the client was configured with
    /// progress enabled.
    pub async fn download_fmu(&self, job_id: &str, destination_dir: &Path) -> Result<PathBuf> {
        let target = if self.config.shows_progress() {
            ProgressTarget::Terminal
        } else {
            ProgressTarget::Hidden
        };
        download::download_fmu(&self.transport, job_id, destination_dir, target).await
    }

    /// Download the FMU of a completed job, advancing `progress` as bytes arrive
    pub async fn download_fmu_with_progress(
        &self,
        job_id: &str,
        destination_dir: &Path,
        progress: &ProgressBar,
    ) -> Result<PathBuf> {
        download::download_fmu(
            &self.transport,
            job_id,
            destination_dir,
            ProgressTarget::Bar(progress),
        )
        .await
    }
}

/// Best effort: an application that already installed a subscriber keeps it
fn install_console_logging() {
    if let Err(e) = init_logging(&LogConfig::default()) {
        debug!(error = %e, "Keeping existing tracing subscriber");
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        matchers::{method, path, query_param},
        Mock, MockServer, ResponseTemplate,
    };

    async fn connected(server: &MockServer) -> Client {
        Mock::given(method("GET"))
            .and(path("/auth/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "u-42"})))
            .mount(server)
            .await;
        Client::connect(ClientConfig::new(server.uri(), "key-1"))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_connect_records_identity() {
        let server = MockServer::start().await;
        let client = connected(&server).await;

        assert_eq!(client.user_id(), "u-42");
        assert_eq!(client.base_url(), server.uri());
    }

    #[tokio::test]
    async fn test_health_check_returns_body() {
        let server = MockServer::start().await;
        let client = connected(&server).await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
            .mount(&server)
            .await;

        let health = client.health_check().await.unwrap();
        assert_eq!(health["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_models_passes_limit() {
        let server = MockServer::start().await;
        let client = connected(&server).await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("limit", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"job_id": "a", "model_name": "Gain", "version": "1.0.0", "status": "COMPLETED"},
                {"job_id": "b", "model_name": "Delay", "status": "RUNNING", "created_at": "2024-01-01"}
            ])))
            .mount(&server)
            .await;

        let models = client.list_models(2).await.unwrap();
        assert_eq!(models.len(), 2);
        assert_eq!(models[1].model_name.as_deref(), Some("Delay"));
        assert!(models[1].extra.contains_key("created_at"));
    }

    #[tokio::test]
    async fn test_status_lookup_fills_missing_job_id() {
        let server = MockServer::start().await;
        let client = connected(&server).await;
        Mock::given(method("GET"))
            .and(path("/models/conversion-status/job-7"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "RUNNING"})))
            .mount(&server)
            .await;

        let record = client.get_conversion_status("job-7").await.unwrap();
        assert_eq!(record.job_id, "job-7");
        assert!(!record.is_completed());
    }

    #[tokio::test]
    async fn test_server_error_keeps_status_code() {
        let server = MockServer::start().await;
        let client = connected(&server).await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server)
            .await;

        let err = client.health_check().await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        assert!(err.to_string().contains("maintenance"));
    }
}
