//! Jingongo CLI - Main entry point

use clap::Parser;
use jingongo_cli::{commands, Cli, Commands};
use jingongo_common::logging::{init_logging, LogConfig, LogLevel, LogOutput};
use std::process;
use tracing::error;

#[tokio::main]
async fn main() {
    // Values from .env act as environment fallbacks for the clap flags
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let log_config = LogConfig::builder()
        .level(if cli.verbose {
            LogLevel::Debug
        } else {
            LogLevel::Warn
        })
        .output(LogOutput::Console)
        .log_file_prefix("jingongo-cli")
        .build();

    // Environment settings take precedence
    let log_config = log_config
        .clone()
        .with_env_overrides()
        .unwrap_or(log_config);

    // The CLI works without logging
    let _guard = init_logging(&log_config).ok();

    if let Err(e) = execute_command(&cli).await {
        error!(error = %e, "Command failed");
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Execute the CLI command
async fn execute_command(cli: &Cli) -> jingongo_cli::Result<()> {
    let config = cli.config();

    match &cli.command {
        Commands::Health => commands::health::run(&config).await,

        Commands::GenerateKey { token } => commands::generate_key::run(&config, token).await,

        Commands::Convert(args) => commands::convert::run(&config, args).await,

        Commands::Status { job_id } => commands::status::run(&config, job_id).await,

        Commands::List { limit } => commands::list::run(&config, *limit).await,

        Commands::Download { job_id, output_dir } => {
            commands::download::run(&config, job_id, output_dir).await
        }

        Commands::LoginUrl { portal_url } => {
            commands::portal::login(portal_url.as_deref());
            Ok(())
        }

        Commands::SignupUrl { portal_url } => {
            commands::portal::signup(portal_url.as_deref());
            Ok(())
        }
    }
}
