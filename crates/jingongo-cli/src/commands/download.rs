//! `jingongo download` command implementation
//!
//! Saves the FMU of a completed job, showing transfer progress.

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use std::path::Path;

/// Download the job's FMU into `output_dir`
pub async fn run(config: &Config, job_id: &str, output_dir: &Path) -> Result<()> {
    let client = config.connect().await?;

    println!("{} Downloading FMU for job {}...", "→".cyan(), job_id);
    let path = client.download_fmu(job_id, output_dir).await?;

    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
    println!(
        "{} Saved {} ({})",
        "✓".green(),
        path.display(),
        jingongo_common::format_bytes(size)
    );
    Ok(())
}
