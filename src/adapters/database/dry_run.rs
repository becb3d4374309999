//! Store used by `--dry-run`: logs every write and touches nothing

use super::traits::DocumentStore;
use crate::domain::{FlatDocument, Result, WriteMode, WriteOutcome};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct DryRunStore;

impl DryRunStore {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DocumentStore for DryRunStore {
    async fn test_connection(&self) -> Result<()> {
        tracing::info!("DRY RUN: Skipping database connection test");
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        tracing::info!("DRY RUN: Would create tables if missing");
        Ok(())
    }

    async fn write_document(
        &self,
        document: &FlatDocument,
        mode: WriteMode,
    ) -> Result<WriteOutcome> {
        let document_type = document.document_type();
        tracing::info!(
            document_type = %document_type,
            document_id = %document.document_id(),
            write_mode = %mode,
            line_items = document.line_item_count(),
            "DRY RUN: Would write document to {} and {} line items to {}",
            document_type.table(),
            document.line_item_count(),
            document_type.line_item_table()
        );
        Ok(WriteOutcome {
            updated: false,
            line_items_deleted: 0,
            line_items_inserted: document.line_item_count(),
        })
    }

    async fn close(&self) {}

    fn backend_name(&self) -> &'static str {
        "dry-run"
    }
}
