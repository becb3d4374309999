//! Command-line interface

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// books-etl - Zoho Books to PostgreSQL ETL Tool
#[derive(Parser, Debug)]
#[command(name = "books-etl")]
#[command(version, about, long_about = None)]
#[command(author = "books-etl Contributors")]
pub struct Cli {
    /// Path to configuration file; settings come from the environment when omitted
    #[arg(short, long, env = "BOOKS_ETL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sync today's invoices, credit notes and bills into the database
    Sync(commands::sync::SyncArgs),

    /// Validate configuration
    ValidateConfig(commands::validate::ValidateArgs),

    /// Write a sample configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentType;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["books-etl", "sync"]);
        assert!(cli.config.is_none());
        assert!(matches!(cli.command, Commands::Sync(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["books-etl", "--config", "books.toml", "sync"]);
        assert_eq!(cli.config, Some(PathBuf::from("books.toml")));
    }

    #[test]
    fn test_cli_parse_sync_types_and_dry_run() {
        let cli = Cli::parse_from(["books-etl", "sync", "--types", "invoices,bills", "--dry-run"]);
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.types, vec![DocumentType::Invoice, DocumentType::Bill]);
                assert!(args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_type() {
        let result = Cli::try_parse_from(["books-etl", "sync", "--types", "estimates"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["books-etl", "-l", "debug", "validate-config"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["books-etl", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(ref args) if args.force));
    }
}
