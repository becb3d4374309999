//! Shared helpers for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use books_etl::adapters::database::DocumentStore;
use books_etl::config::{secret_string, BooksEtlConfig};
use books_etl::domain::{
    DocumentType, EtlError, FlatDocument, Result, WriteMode, WriteOutcome,
};
use std::sync::Mutex;

/// Mirrors the PostgreSQL tables closely enough to observe merge and append
///
/// `bills` has a primary key, so appending a stored bill fails like it does
/// in the database. Invoices and credit notes accept duplicates.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

#[derive(Default)]
struct StoreState {
    parents: Vec<FlatDocument>,
    line_items: Vec<(DocumentType, String)>,
    line_item_inserts: usize,
    connection_tests: usize,
    schema_calls: usize,
    closed: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parent_count(&self, document_type: DocumentType) -> usize {
        let state = self.state.lock().unwrap();
        state
            .parents
            .iter()
            .filter(|d| d.document_type() == document_type)
            .count()
    }

    pub fn line_item_count(&self, document_type: DocumentType, parent_id: &str) -> usize {
        let state = self.state.lock().unwrap();
        state
            .line_items
            .iter()
            .filter(|(t, id)| *t == document_type && id == parent_id)
            .count()
    }

    pub fn parent(&self, document_type: DocumentType, id: &str) -> Option<FlatDocument> {
        let state = self.state.lock().unwrap();
        state
            .parents
            .iter()
            .find(|d| d.document_type() == document_type && d.document_id().as_str() == id)
            .cloned()
    }

    /// Line item rows inserted over the life of the store
    pub fn line_item_inserts(&self) -> usize {
        self.state.lock().unwrap().line_item_inserts
    }

    pub fn connection_tests(&self) -> usize {
        self.state.lock().unwrap().connection_tests
    }

    pub fn schema_calls(&self) -> usize {
        self.state.lock().unwrap().schema_calls
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().unwrap().closed
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn test_connection(&self) -> Result<()> {
        self.state.lock().unwrap().connection_tests += 1;
        Ok(())
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.state.lock().unwrap().schema_calls += 1;
        Ok(())
    }

    async fn write_document(
        &self,
        document: &FlatDocument,
        mode: WriteMode,
    ) -> Result<WriteOutcome> {
        let mut state = self.state.lock().unwrap();
        let document_type = document.document_type();
        let id = document.document_id().as_str().to_string();
        let existing = state
            .parents
            .iter()
            .position(|d| d.document_type() == document_type && d.document_id().as_str() == id);

        let mut outcome = WriteOutcome::default();
        match mode {
            WriteMode::Merge => {
                match existing {
                    Some(index) => {
                        state.parents[index] = document.clone();
                        outcome.updated = true;
                    }
                    None => state.parents.push(document.clone()),
                }
                let before = state.line_items.len();
                state
                    .line_items
                    .retain(|(t, parent)| !(*t == document_type && *parent == id));
                outcome.line_items_deleted = (before - state.line_items.len()) as u64;
            }
            WriteMode::Append => {
                if existing.is_some() && document_type == DocumentType::Bill {
                    return Err(EtlError::Database(format!(
                        "duplicate key value violates unique constraint \"bills_pkey\" ({id})"
                    )));
                }
                state.parents.push(document.clone());
            }
        }

        let count = document.line_item_count();
        for _ in 0..count {
            state.line_items.push((document_type, id.clone()));
        }
        state.line_item_inserts += count;
        outcome.line_items_inserted = count;
        Ok(outcome)
    }

    async fn close(&self) {
        self.state.lock().unwrap().closed = true;
    }

    fn backend_name(&self) -> &'static str {
        "in-memory"
    }
}

/// Configuration pointing the accounts and API endpoints at `server_url`
pub fn test_config(server_url: &str) -> BooksEtlConfig {
    let mut config = BooksEtlConfig::default();
    config.books.accounts_url = format!("{server_url}/oauth/v2/token");
    config.books.default_api_domain = server_url.to_string();
    config.books.organization_id = "60012345678".to_string();
    config.books.client_id = "1000.TESTCLIENT".to_string();
    config.books.client_secret = Some(secret_string("client-secret".to_string()));
    config.books.refresh_token = Some(secret_string("1000.refresh".to_string()));
    config.books.redirect_uri = "https://example.com/callback".to_string();
    config.books.rate_limit_delay_ms = 0;
    config.books.timeout_seconds = 5;
    config
}
