//! `jingongo convert` command implementation
//!
//! Submits a model project for cloud conversion and, unless `--no-wait` is
//! given, waits for the job to finish.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::progress;
use crate::ConvertArgs;
use colored::Colorize;
use jingongo::{ConversionOptions, PollConfig, VariableSpec};
use serde_json::Value;
use std::time::Duration;

/// Submit a conversion and optionally wait for it and download the result
pub async fn run(config: &Config, args: &ConvertArgs) -> Result<()> {
    let options = build_options(args)?;
    let poll = build_poll_config(args)?;

    let client = config.connect().await?;

    println!(
        "{} Packaging and uploading {}...",
        "→".cyan(),
        args.path.display()
    );
    let job = client.submit_conversion(&args.path, &options).await?;
    println!(
        "{} Conversion job {} started for {}",
        "✓".green(),
        job.job_id.bold(),
        job.model_name
    );

    if args.no_wait {
        println!("Check on it with 'jingongo status {}'", job.job_id);
        return Ok(());
    }

    let spinner = progress::create_spinner(&format!("Waiting for job {}", job.job_id));
    let outcome = client.await_completion(&job.job_id, &poll).await;
    spinner.finish_and_clear();
    outcome?;

    println!("{} FMU conversion completed", "✓".green());

    match &args.download_to {
        Some(dir) => {
            let path = client.download_fmu(&job.job_id, dir).await?;
            println!("{} FMU saved to {}", "✓".green(), path.display());
        }
        None => println!("Download it with 'jingongo download {}'", job.job_id),
    }

    Ok(())
}

/// Explicit overrides from the command line
pub fn build_options(args: &ConvertArgs) -> Result<ConversionOptions> {
    let mut options = ConversionOptions::new();

    if let Some(name) = &args.name {
        options = options.model_name(name);
    }
    if let Some(version) = &args.model_version {
        options = options.version(version);
    }
    if let Some(description) = &args.description {
        options = options.description(description);
    }
    if let Some(language) = &args.language {
        options = options.language(language);
    }
    if let Some(component_type) = &args.component_type {
        options = options.component_type(component_type);
    }
    if let Some(fmi_type) = &args.fmi_type {
        options = options.fmi_type(fmi_type);
    }

    // Empty lists leave the project file's lists in place
    if !args.inputs.is_empty() {
        options = options.inputs(parse_variables(&args.inputs)?);
    }
    if !args.outputs.is_empty() {
        options = options.outputs(parse_variables(&args.outputs)?);
    }
    if !args.parameters.is_empty() {
        options = options.parameters(parse_parameters(&args.parameters)?);
    }

    Ok(options)
}

/// Polling behaviour requested on the command line
pub fn build_poll_config(args: &ConvertArgs) -> Result<PollConfig> {
    if args.poll_interval == 0 {
        return Err(CliError::invalid_input("--poll-interval must be at least 1 second"));
    }

    let mut poll = PollConfig::default().with_interval(Duration::from_secs(args.poll_interval));
    if let Some(max) = args.max_attempts {
        poll = poll.with_max_attempts(max);
    }
    if let Some(secs) = args.timeout_secs {
        poll = poll.with_timeout(Duration::from_secs(secs));
    }
    Ok(poll)
}

/// Parse `NAME` or `NAME:TYPE` entries
fn parse_variables(entries: &[String]) -> Result<Vec<VariableSpec>> {
    entries
        .iter()
        .map(|entry| {
            let variable = match entry.split_once(':') {
                Some((name, ty)) => VariableSpec::typed(name.trim(), ty.trim()),
                None => VariableSpec::new(entry.trim()),
            };
            if variable.name.is_empty() {
                return Err(CliError::invalid_input(format!(
                    "variable '{}' has no name",
                    entry
                )));
            }
            Ok(variable)
        })
        .collect()
}

/// Parse `NAME` or `NAME=DEFAULT` entries
///
/// Defaults that read as JSON (numbers, booleans) keep their type; anything
/// else is sent as a string.
fn parse_parameters(entries: &[String]) -> Result<Vec<VariableSpec>> {
    entries
        .iter()
        .map(|entry| {
            let variable = match entry.split_once('=') {
                Some((name, raw)) => {
                    let raw = raw.trim();
                    let default = serde_json::from_str::<Value>(raw)
                        .unwrap_or_else(|_| Value::String(raw.to_string()));
                    VariableSpec::with_default(name.trim(), default)
                }
                None => VariableSpec::new(entry.trim()),
            };
            if variable.name.is_empty() {
                return Err(CliError::invalid_input(format!(
                    "parameter '{}' has no name",
                    entry
                )));
            }
            Ok(variable)
        })
        .collect()
}
