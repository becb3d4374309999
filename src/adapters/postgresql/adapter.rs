//! PostgreSQL implementation of [`DocumentStore`]

use super::client::PostgresClient;
use super::writer;
use crate::adapters::database::traits::DocumentStore;
use crate::config::schema::DatabaseConfig;
use crate::domain::{EtlError, FlatDocument, Result, WriteMode, WriteOutcome};
use async_trait::async_trait;

/// Writes documents to PostgreSQL, one transaction per document
pub struct PostgresStore {
    client: PostgresClient,
}

impl PostgresStore {
    /// Create the store and its connection pool
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        Ok(Self {
            client: PostgresClient::new(config)?,
        })
    }
}

#[async_trait]
impl DocumentStore for PostgresStore {
    async fn test_connection(&self) -> Result<()> {
        self.client.test_connection().await
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.client.ensure_schema().await
    }

    async fn write_document(
        &self,
        document: &FlatDocument,
        mode: WriteMode,
    ) -> Result<WriteOutcome> {
        let mut connection = self.client.get_connection().await?;
        let tx = connection
            .transaction()
            .await
            .map_err(|e| EtlError::Database(format!("Failed to begin transaction: {e}")))?;

        tx.batch_execute(&self.client.statement_timeout_sql())
            .await
            .map_err(|e| EtlError::Database(format!("Failed to set statement timeout: {e}")))?;

        // Dropping `tx` on error rolls the document back.
        let outcome = writer::write_document(&tx, document, mode).await?;

        tx.commit()
            .await
            .map_err(|e| EtlError::Database(format!("Failed to commit transaction: {e}")))?;

        tracing::debug!(
            document_type = %document.document_type(),
            document_id = %document.document_id(),
            updated = outcome.updated,
            line_items_deleted = outcome.line_items_deleted,
            line_items_inserted = outcome.line_items_inserted,
            "Document committed"
        );

        Ok(outcome)
    }

    async fn close(&self) {
        self.client.close();
    }

    fn backend_name(&self) -> &'static str {
        "postgresql"
    }
}
