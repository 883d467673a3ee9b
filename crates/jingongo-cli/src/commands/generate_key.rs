//! `jingongo generate-key` command implementation
//!
//! Exchanges a short-lived portal token for a long-lived API key. No API key
//! is needed to run it.

use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use jingongo::generate_api_key_from_token;

/// Request a new API key and print it
pub async fn run(config: &Config, token: &str) -> Result<()> {
    let api_url = config.require_api_url()?;

    println!("{} Requesting a new API key...", "→".cyan());
    let api_key = generate_api_key_from_token(api_url, token).await?;

    println!("{} API key generated", "✓".green());
    println!();
    println!("{}", api_key.bold());
    println!();
    println!("Store it securely, for example in .env:");
    println!("  JINGONGO_API_KEY={}", api_key);

    Ok(())
}
