//! `jingongo status` command implementation
//!
//! Shows the current state of one conversion job.

use crate::config::Config;
use crate::error::Result;
use colored::{ColoredString, Colorize};
use jingongo::{JobRecord, JobStatus};

/// Look up a job and print its state
pub async fn run(config: &Config, job_id: &str) -> Result<()> {
    let client = config.connect().await?;
    let record = client.get_conversion_status(job_id).await?;
    print_record(&record);
    Ok(())
}

fn print_record(record: &JobRecord) {
    println!("{}", "Conversion Job:".cyan().bold());
    println!("  Job ID: {}", record.job_id);
    match &record.status {
        Some(status) => println!("  Status: {}", paint_status(status)),
        None => println!("  Status: {}", "unknown".dimmed()),
    }
    if let Some(message) = &record.error_message {
        println!("  Error:  {}", message.red());
    }
    for (key, value) in &record.extra {
        match value.as_str() {
            Some(text) => println!("  {}: {}", key, text),
            None => println!("  {}: {}", key, value),
        }
    }
}

/// Color a status for terminal output
pub fn paint_status(status: &JobStatus) -> ColoredString {
    match status {
        JobStatus::Completed => status.as_str().green(),
        JobStatus::Failed => status.as_str().red(),
        JobStatus::Running => status.as_str().yellow(),
        JobStatus::Pending | JobStatus::Other(_) => status.as_str().normal(),
    }
}
