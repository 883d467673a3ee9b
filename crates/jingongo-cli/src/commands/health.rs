//! `jingongo health` command implementation
//!
//! Verifies the API key and reports the service health payload.

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;

/// Connect, then print the health response
pub async fn run(config: &Config) -> Result<()> {
    let client = config.connect().await?;
    println!(
        "{} Authenticated as {}",
        "✓".green(),
        client.user_id().bold()
    );

    let health = client.health_check().await?;
    println!("{} Service is up at {}", "✓".green(), client.base_url());

    let rendered = serde_json::to_string_pretty(&health).unwrap_or_else(|_| health.to_string());
    println!("{}", rendered);

    Ok(())
}
