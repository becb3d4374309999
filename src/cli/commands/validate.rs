//! `validate-config` command

use crate::config::{load_config, BooksEtlConfig};
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let source = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "environment".to_string());
        tracing::info!(source = %source, "Validating configuration");

        println!("🔍 Validating configuration from {source}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                for line in summary_lines(&config) {
                    println!("{line}");
                }
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(e.exit_code())
            }
        }
    }
}

fn redacted(present: bool) -> &'static str {
    if present {
        "***"
    } else {
        "(not set)"
    }
}

/// Configuration summary with every secret masked
fn summary_lines(config: &BooksEtlConfig) -> Vec<String> {
    let books = &config.books;
    let db = &config.database;
    let types = config
        .sync
        .document_types
        .iter()
        .map(|t| t.endpoint())
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        "Configuration Summary:".to_string(),
        format!("  Log Level: {}", config.application.log_level),
        format!("  Dry Run: {}", config.application.dry_run),
        format!("  Accounts URL: {}", books.accounts_url),
        format!("  Organization: {}", books.organization_id),
        format!("  Client ID: {}", books.client_id),
        format!("  Client Secret: {}", redacted(books.client_secret.is_some())),
        format!("  Refresh Token: {}", redacted(books.refresh_token.is_some())),
        format!("  Page Size: {}", books.per_page),
        format!(
            "  Bills Status Filter: {}",
            books
                .bills_status_filter
                .map(|f| f.to_string())
                .unwrap_or_else(|| "(none)".to_string())
        ),
        format!(
            "  Database: {}://{}@{}:{}/{}",
            db.driver, db.username, db.host, db.port, db.database
        ),
        format!("  Database Password: {}", redacted(db.password.is_some())),
        format!("  Document Types: {types}"),
    ];

    for document_type in &config.sync.document_types {
        lines.push(format!(
            "  {}: on_list_error={}, write_mode={}",
            document_type.label(),
            config.sync.list_error_policy(*document_type),
            config.sync.write_mode(*document_type)
        ));
    }
    lines
}
