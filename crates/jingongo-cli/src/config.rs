//! Configuration management for the Jingongo CLI
//!
//! Collects the connection settings given on the command line (or through
//! their environment fallbacks) and turns them into an SDK client.

use crate::error::{CliError, Result};
use jingongo::{Client, ClientConfig};
use std::time::Duration;

/// CLI connection settings
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Jingongo API base URL
    pub api_url: Option<String>,

    /// Long-lived API key
    pub api_key: Option<String>,

    /// Request timeout override in seconds
    pub timeout_secs: Option<u64>,
}

impl Config {
    pub fn new(
        api_url: Option<String>,
        api_key: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Self {
        Self {
            api_url: non_empty(api_url),
            api_key: non_empty(api_key),
            timeout_secs,
        }
    }

    /// API base URL, required by every command that talks to the service
    pub fn require_api_url(&self) -> Result<&str> {
        self.api_url
            .as_deref()
            .ok_or_else(|| CliError::config("No API base URL configured"))
    }

    /// Build the SDK configuration with terminal progress enabled
    pub fn client_config(&self) -> Result<ClientConfig> {
        let api_url = self.require_api_url()?;
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CliError::config("No API key configured"))?;

        let mut config = ClientConfig::new(api_url, api_key).with_progress(true);
        if let Some(secs) = self.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    /// Connect and verify the API key
    pub async fn connect(&self) -> Result<Client> {
        Ok(Client::connect(self.client_config()?).await?)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
