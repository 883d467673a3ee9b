//! `jingongo list` command implementation
//!
//! Lists recent conversion jobs in a table.

use crate::commands::status::paint_status;
use crate::config::Config;
use crate::error::Result;
use colored::Colorize;
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use jingongo::ModelSummary;

/// Fetch up to `limit` recent jobs and print them
pub async fn run(config: &Config, limit: u32) -> Result<()> {
    let client = config.connect().await?;
    let models = client.list_models(limit).await?;

    if models.is_empty() {
        println!("No conversion jobs found.");
        println!("Run 'jingongo convert <path>' to start one.");
        return Ok(());
    }

    println!("{}", render_table(&models));
    println!("{} {} job(s)", "✓".green(), models.len());
    Ok(())
}

fn render_table(models: &[ModelSummary]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_header(vec!["Job ID", "Model", "Version", "Status"]);

    for model in models {
        let status = model
            .status
            .as_ref()
            .map(|s| paint_status(s).to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            model.job_id.clone().unwrap_or_else(|| "-".to_string()),
            model.model_name.clone().unwrap_or_else(|| "-".to_string()),
            model.version.clone().unwrap_or_else(|| "-".to_string()),
            status,
        ]);
    }

    table
}
