//! Jingongo SDK
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Client library for the Jingongo cloud service that turns simulation model
//! projects into FMUs (Functional Mock-up Units).
//!
//! # Overview
//!
//! - **Authentication**: the API key is confirmed once when a [`Client`] connects
//! - **Packaging**: the project directory is zipped into a scoped temporary location
//! - **Upload**: the archive goes straight to storage through a signed URL
//! - **Conversion**: defaults, `.jingongo.yml` and explicit options are merged
//!   into one request
//! - **Polling**: the job is checked at a fixed interval until it completes or fails
//! - **Download**: the finished FMU is streamed to disk with progress feedback
//!
//! # Example
//!
//! ```no_run
//! use jingongo::{Client, ClientConfig, ConversionOptions, PollConfig};
//! use std::path::Path;
//!
//! # async fn run() -> jingongo::Result<()> {
//! let client = Client::connect(ClientConfig::from_env()).await?;
//!
//! let options = ConversionOptions::new().model_name("IdentityBlock").version("1.0.0");
//! let job = client.submit_conversion(Path::new("./identity_block"), &options).await?;
//! client.await_completion(&job.job_id, &PollConfig::default()).await?;
//!
//! let fmu = client.download_fmu(&job.job_id, Path::new("./fmu_downloads")).await?;
//! println!("Saved {}", fmu.display());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod download;
pub mod error;
pub mod packager;
pub mod poller;
pub mod progress;
pub mod project;
pub mod transport;
pub mod upload;

// Re-export commonly used types
pub use api::{ConversionJob, ConversionRequest, JobRecord, JobStatus, ModelSummary};
pub use auth::{generate_api_key_from_token, login_url, signup_url, Identity};
pub use client::Client;
pub use config::ClientConfig;
pub use error::{JingongoError, Result};
pub use poller::PollConfig;
pub use project::{resolve_request, ConversionOptions, ModelConfig, VariableSpec};
