//! Sync coordinator - drives one run from token refresh to the last write

use crate::adapters::books::{build_http_client, BooksClient, DocumentPager, TokenProvider};
use crate::adapters::database::DocumentStore;
use crate::config::BooksEtlConfig;
use crate::core::sync::summary::{SyncError, SyncErrorType, SyncSummary};
use crate::core::transform::flatten;
use crate::domain::{DocumentType, Result, SyncWindow};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Runs the list, fetch, map and persist pipeline for each document type
pub struct SyncCoordinator {
    config: BooksEtlConfig,
    store: Arc<dyn DocumentStore>,
}

impl SyncCoordinator {
    pub fn new(config: BooksEtlConfig, store: Arc<dyn DocumentStore>) -> Self {
        Self { config, store }
    }

    /// Sync the configured document types for `window`
    ///
    /// See [`SyncCoordinator::run_with_types`].
    pub async fn run(&self, window: SyncWindow) -> Result<SyncSummary> {
        let types = self.config.sync.document_types.clone();
        self.run_with_types(window, &types).await
    }

    /// Sync `types`, in order, for `window`
    ///
    /// # Errors
    ///
    /// Configuration and authentication failures are returned before any
    /// document endpoint or the store is touched. Errors after that point stop
    /// the run and are reported through [`SyncSummary::run_error`]; documents
    /// already committed stay committed.
    pub async fn run_with_types(
        &self,
        window: SyncWindow,
        types: &[DocumentType],
    ) -> Result<SyncSummary> {
        let run_id = uuid::Uuid::new_v4().to_string();
        let span = tracing::info_span!("sync_run", run_id = %run_id);

        async move {
            let start_time = Instant::now();
            let mut summary = SyncSummary::new(run_id, self.config.application.dry_run);

            tracing::info!(
                backend = self.store.backend_name(),
                date_start = %window.start_param(),
                date_end = %window.end_param(),
                types = ?types,
                "Starting sync"
            );

            let client = match self.connect().await {
                Ok(client) => client,
                Err(e) => {
                    self.store.close().await;
                    return Err(e);
                }
            };

            let result = self
                .sync_all(&client, &window, types, &mut summary)
                .await;

            self.store.close().await;

            if let Err(e) = result {
                tracing::error!(error = %e, "Sync run failed");
                summary.run_error = Some(e.to_string());
            }

            summary.duration = start_time.elapsed();
            Ok(summary)
        }
        .instrument(span)
        .await
    }

    /// Refresh the access token and bind a client to its API domain
    async fn connect(&self) -> Result<BooksClient> {
        let http = build_http_client(&self.config.books)?;
        let token = TokenProvider::new(http.clone(), &self.config.books)
            .refresh()
            .await?;
        BooksClient::new(http, &self.config.books, token)
    }

    async fn sync_all(
        &self,
        client: &BooksClient,
        window: &SyncWindow,
        types: &[DocumentType],
        summary: &mut SyncSummary,
    ) -> Result<()> {
        if let Err(e) = self.prepare_store().await {
            summary.add_error(SyncError::new(SyncErrorType::Storage, e.to_string()));
            return Err(e);
        }

        for &document_type in types {
            if let Err(e) = self
                .sync_type(client, document_type, window, summary)
                .await
            {
                summary.add_error(
                    SyncError::new(SyncErrorType::List, e.to_string())
                        .with_context(document_type.endpoint()),
                );
                return Err(e);
            }
        }
        Ok(())
    }

    async fn prepare_store(&self) -> Result<()> {
        self.store.test_connection().await?;
        self.store.ensure_schema().await
    }

    async fn sync_type(
        &self,
        client: &BooksClient,
        document_type: DocumentType,
        window: &SyncWindow,
        summary: &mut SyncSummary,
    ) -> Result<()> {
        let policy = self.config.sync.list_error_policy(document_type);
        let write_mode = self.config.sync.write_mode(document_type);
        let delay = Duration::from_millis(self.config.books.rate_limit_delay_ms);

        tracing::info!(
            document_type = %document_type,
            on_list_error = %policy,
            write_mode = %write_mode,
            "Syncing {}",
            document_type.label()
        );
        summary.type_mut(document_type);

        let mut pager = DocumentPager::new(client, document_type, *window, policy);

        while let Some(page) = pager.next_page().await? {
            tracing::info!(
                document_type = %document_type,
                page = page.number,
                count = page.summaries.len(),
                "Fetched list page"
            );
            {
                let counters = summary.type_mut(document_type);
                counters.pages += 1;
                counters.listed += page.summaries.len();
            }

            for document in &page.summaries {
                let context = format!("{}/{}", document_type.endpoint(), document.id);

                let detail = client.fetch_detail(document_type, &document.id).await;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }

                let detail = match detail {
                    Ok(Some(detail)) => detail,
                    Ok(None) => {
                        tracing::warn!(
                            document_type = %document_type,
                            document_id = %document.id,
                            "No '{}' in detail response, skipping",
                            document_type.detail_key()
                        );
                        summary.type_mut(document_type).skipped += 1;
                        continue;
                    }
                    Err(e) => {
                        tracing::error!(
                            document_type = %document_type,
                            document_id = %document.id,
                            error = %e,
                            "Failed to fetch document detail, skipping"
                        );
                        summary.type_mut(document_type).skipped += 1;
                        summary.add_error(
                            SyncError::new(SyncErrorType::DetailFetch, e.to_string())
                                .with_context(context),
                        );
                        continue;
                    }
                };

                let flat = flatten(document_type, &document.id, &detail);

                match self.store.write_document(&flat, write_mode).await {
                    Ok(outcome) => {
                        tracing::info!(
                            document_type = %document_type,
                            document_id = %document.id,
                            number = document.number.as_deref().unwrap_or(""),
                            updated = outcome.updated,
                            line_items = outcome.line_items_inserted,
                            "Document written"
                        );
                        let counters = summary.type_mut(document_type);
                        counters.written += 1;
                        counters.line_items_written += outcome.line_items_inserted;
                    }
                    Err(e) => {
                        tracing::error!(
                            document_type = %document_type,
                            document_id = %document.id,
                            error = %e,
                            "Failed to write document"
                        );
                        summary.type_mut(document_type).failed += 1;
                        summary.add_error(
                            SyncError::new(SyncErrorType::Persistence, e.to_string())
                                .with_context(context),
                        );
                    }
                }
            }
        }

        if pager.truncated() {
            summary.type_mut(document_type).truncated = true;
            summary.add_error(
                SyncError::new(
                    SyncErrorType::List,
                    format!(
                        "List response without '{}', paging truncated",
                        document_type.collection_key()
                    ),
                )
                .with_context(document_type.endpoint()),
            );
        }

        Ok(())
    }
}

/// Maps a finished run to the process exit code
pub fn exit_code_for(result: &Result<SyncSummary>) -> i32 {
    match result {
        Ok(summary) if summary.is_successful() => 0,
        Ok(_) => 1,
        Err(e) => e.exit_code(),
    }
}

