// books-etl - Zoho Books to PostgreSQL ETL Tool
// Copyright (c) 2025 books-etl Contributors
// Licensed under the MIT License

use books_etl::cli::{Cli, Commands};
use books_etl::config::{load_config, LoggingConfig};
use books_etl::logging::init_logging;
use clap::Parser;
use std::process;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // A missing .env is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // File logging settings come from the configuration when it loads; the
    // commands report configuration errors themselves.
    let (config_level, logging_config) = match load_config(cli.config.as_deref()) {
        Ok(config) => (Some(config.application.log_level), config.logging),
        Err(_) => (None, LoggingConfig::default()),
    };
    let log_level = cli
        .log_level
        .clone()
        .or(config_level)
        .unwrap_or_else(|| "info".to_string());

    let guard = match init_logging(&log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(2);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "books-etl - Zoho Books to PostgreSQL ETL Tool"
    );

    let exit_code = match execute_command(&cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            1
        }
    };

    drop(guard);
    process::exit(exit_code);
}

async fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    let config_path = cli.config.as_deref();
    match &cli.command {
        Commands::Sync(args) => args.execute(config_path).await,
        Commands::ValidateConfig(args) => args.execute(config_path).await,
        Commands::Init(args) => args.execute().await,
    }
}
