//! Jingongo CLI Library
//!
//! Command-line front-end for the Jingongo FMU conversion service.
//!
//! # Overview
//!
//! - **Connectivity**: check the service and your key (`jingongo health`)
//! - **Credentials**: trade a portal token for an API key (`jingongo generate-key`)
//! - **Conversion**: package, upload and convert a model project (`jingongo convert`)
//! - **Job Tracking**: inspect one job or list recent ones (`jingongo status`, `jingongo list`)
//! - **Artifacts**: fetch a finished FMU (`jingongo download`)
//! - **Portal**: print the sign-in and sign-up pages (`jingongo login-url`, `jingongo signup-url`)

pub mod commands;
pub mod config;
pub mod error;
pub mod progress;

// Re-export commonly used types
pub use config::Config;
pub use error::{CliError, Result};

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Jingongo - convert simulation models into FMUs in the cloud
#[derive(Parser, Debug)]
#[command(name = "jingongo")]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Jingongo API base URL
    #[arg(long, env = "JINGONGO_API_BASE_URL", global = true)]
    pub api_url: Option<String>,

    /// Long-lived API key
    #[arg(long, env = "JINGONGO_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "JINGONGO_API_TIMEOUT_SECS", global = true)]
    pub timeout: Option<u64>,
}

impl Cli {
    /// Connection settings shared by all subcommands
    pub fn config(&self) -> Config {
        Config::new(self.api_url.clone(), self.api_key.clone(), self.timeout)
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check that the service is reachable and the API key is accepted
    Health,

    /// Generate a long-lived API key from a short-lived portal token
    GenerateKey {
        /// Identity token copied from the Jingongo portal
        #[arg(long, env = "TEMPORARY_USER_TOKEN", hide_env_values = true)]
        token: String,
    },

    /// Package a model project and convert it into an FMU
    Convert(ConvertArgs),

    /// Show the status of a conversion job
    Status {
        /// Conversion job ID
        job_id: String,
    },

    /// List recent conversion jobs
    List {
        /// Maximum number of jobs to show
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },

    /// Download the FMU produced by a completed job
    Download {
        /// Conversion job ID
        job_id: String,

        /// Directory to save the FMU into (created if missing)
        #[arg(short, long, default_value = "./fmu_downloads")]
        output_dir: PathBuf,
    },

    /// Print the portal sign-in page
    LoginUrl {
        /// Portal base URL
        #[arg(long)]
        portal_url: Option<String>,
    },

    /// Print the portal sign-up page
    SignupUrl {
        /// Portal base URL
        #[arg(long)]
        portal_url: Option<String>,
    },
}

/// Arguments of `jingongo convert`
///
/// Anything given here overrides the project's `.jingongo.yml`.
#[derive(Args, Debug, Clone)]
pub struct ConvertArgs {
    /// Model project directory
    pub path: PathBuf,

    /// Model name
    #[arg(short, long)]
    pub name: Option<String>,

    /// Model version
    #[arg(short = 'V', long = "model-version")]
    pub model_version: Option<String>,

    /// Model description
    #[arg(short, long)]
    pub description: Option<String>,

    /// Source language of the model
    #[arg(long)]
    pub language: Option<String>,

    /// Component type
    #[arg(long)]
    pub component_type: Option<String>,

    /// FMI type (CoSimulation or ModelExchange)
    #[arg(long)]
    pub fmi_type: Option<String>,

    /// Input variable as NAME or NAME:TYPE (repeatable)
    #[arg(long = "input", value_name = "NAME[:TYPE]")]
    pub inputs: Vec<String>,

    /// Output variable as NAME or NAME:TYPE (repeatable)
    #[arg(long = "output", value_name = "NAME[:TYPE]")]
    pub outputs: Vec<String>,

    /// Parameter as NAME or NAME=DEFAULT (repeatable)
    #[arg(long = "param", value_name = "NAME[=DEFAULT]")]
    pub parameters: Vec<String>,

    /// Return after submitting instead of waiting for the job
    #[arg(long)]
    pub no_wait: bool,

    /// Seconds between status checks
    #[arg(long, default_value_t = jingongo::poller::DEFAULT_POLL_INTERVAL_SECS)]
    pub poll_interval: u64,

    /// Give up after this many status checks
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Give up after this many seconds of waiting
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Download the FMU into this directory once the job completes
    #[arg(long, value_name = "DIR")]
    pub download_to: Option<PathBuf>,
}
