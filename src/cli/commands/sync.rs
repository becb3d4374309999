//! `sync` command

use crate::adapters::database::create_document_store;
use crate::config::{load_config, BooksEtlConfig};
use crate::core::sync::{exit_code_for, SyncCoordinator, SyncSummary};
use crate::domain::{DocumentType, EtlError, Result, SyncWindow};
use clap::Args;
use std::path::Path;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Document types to sync (comma-separated: invoices, creditnotes, bills)
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<DocumentType>,

    /// Run the pipeline but log writes instead of executing them
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(&self, config_path: Option<&Path>) -> anyhow::Result<i32> {
        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };
        if let Err(e) = self.apply_overrides(&mut config) {
            crate::log_error_with_context!(&e, "Invalid command line options");
            eprintln!("❌ {e}");
            return Ok(e.exit_code());
        }

        if config.application.dry_run {
            tracing::info!("DRY RUN mode enabled - no data will be written to the database");
        }

        let store = match create_document_store(&config) {
            Ok(store) => store,
            Err(e) => {
                crate::log_error_with_context!(&e, "Failed to create document store");
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        let coordinator = SyncCoordinator::new(config, store);
        let result = coordinator.run(SyncWindow::today()).await;

        match &result {
            Ok(summary) => {
                summary.log_summary();
                print_summary(summary);
            }
            Err(e) => {
                crate::log_error_with_context!(e, "Sync aborted before any document was processed");
                eprintln!("❌ {e}");
            }
        }

        Ok(exit_code_for(&result))
    }

    /// Applies `--dry-run` and `--types`, then revalidates the sync section
    fn apply_overrides(&self, config: &mut BooksEtlConfig) -> Result<()> {
        if self.dry_run {
            config.application.dry_run = true;
        }
        if !self.types.is_empty() {
            config.sync.document_types = self.types.clone();
        }
        config
            .validate()
            .map_err(|e| EtlError::Configuration(format!("Invalid sync options: {e}")))
    }
}

fn print_summary(summary: &SyncSummary) {
    println!();
    if summary.dry_run {
        println!("Sync summary (dry run)");
    } else {
        println!("Sync summary");
    }
    for t in &summary.types {
        println!(
            "  {:<13} pages: {:<3} listed: {:<5} written: {:<5} skipped: {:<4} failed: {:<4} line items: {}{}",
            t.document_type.label(),
            t.pages,
            t.listed,
            t.written,
            t.skipped,
            t.failed,
            t.line_items_written,
            if t.truncated { " (truncated)" } else { "" }
        );
    }
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    if let Some(run_error) = &summary.run_error {
        println!("❌ Sync stopped early: {run_error}");
    } else if summary.total_failed() > 0 {
        println!("⚠️  {} document(s) failed to persist", summary.total_failed());
    } else {
        println!("✅ Sync completed");
    }
}
