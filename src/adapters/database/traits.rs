//! Storage abstraction
//!
//! The orchestrator writes through [`DocumentStore`] so the PostgreSQL
//! backend, the dry-run logger and test doubles are interchangeable.

use crate::domain::{FlatDocument, Result, WriteMode, WriteOutcome};
use async_trait::async_trait;

/// A relational store for flattened documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Test the connection
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be reached.
    async fn test_connection(&self) -> Result<()>;

    /// Create the parent and line-item tables if they do not exist
    ///
    /// # Errors
    ///
    /// Returns an error if the schema statements fail.
    async fn ensure_schema(&self) -> Result<()>;

    /// Persist one document and its line items in a single transaction
    ///
    /// Under [`WriteMode::Merge`] the parent row is updated or inserted and
    /// the stored line items for the parent are replaced by the new set (an
    /// empty set only deletes). Under [`WriteMode::Append`] both are inserted
    /// unconditionally.
    ///
    /// # Errors
    ///
    /// Returns an error if any statement fails; nothing of the document is
    /// committed in that case.
    async fn write_document(&self, document: &FlatDocument, mode: WriteMode)
        -> Result<WriteOutcome>;

    /// Release connections held by the store
    async fn close(&self);

    /// Backend name for logs
    fn backend_name(&self) -> &'static str;
}
