//! Lazy walk over the pages of one collection

use super::client::BooksClient;
use super::models::{DocumentSummary, ListResponse, Page};
use crate::domain::{BooksApiError, DocumentType, ListErrorPolicy, Result, SyncWindow};

/// Yields the summary pages of one document type within a date window
///
/// Paging stops on an empty page, when `page_context.has_more_page` is false,
/// or when a malformed page is truncated under [`ListErrorPolicy::Truncate`].
pub struct DocumentPager<'a> {
    client: &'a BooksClient,
    document_type: DocumentType,
    window: SyncWindow,
    policy: ListErrorPolicy,
    next: Option<u32>,
    truncated: bool,
}

impl<'a> DocumentPager<'a> {
    pub fn new(
        client: &'a BooksClient,
        document_type: DocumentType,
        window: SyncWindow,
        policy: ListErrorPolicy,
    ) -> Self {
        Self {
            client,
            document_type,
            window,
            policy,
            next: Some(1),
            truncated: false,
        }
    }

    /// True if paging stopped on a malformed page instead of the last page
    pub fn truncated(&self) -> bool {
        self.truncated
    }

    /// Fetches the next page, `Ok(None)` once the collection is exhausted
    ///
    /// # Errors
    ///
    /// Transport failures and non-JSON bodies propagate. A page without its
    /// collection, including a non-2xx JSON body, is an
    /// [`BooksApiError::UnexpectedListShape`] error under
    /// [`ListErrorPolicy::Abort`].
    pub async fn next_page(&mut self) -> Result<Option<Page>> {
        let Some(current) = self.next else {
            return Ok(None);
        };

        let response = self
            .client
            .list_page(self.document_type, &self.window, current)
            .await;

        let response = match response {
            Ok(response) => response,
            Err(e) => {
                self.next = None;
                return Err(e);
            }
        };

        let (entries, page_context) = match response {
            ListResponse::Page {
                entries,
                page_context,
            } => (entries, page_context),
            ListResponse::Unexpected { body } => {
                self.next = None;
                return match self.policy {
                    ListErrorPolicy::Abort => Err(BooksApiError::UnexpectedListShape {
                        document_type: self.document_type,
                        page: current,
                        body,
                    }
                    .into()),
                    ListErrorPolicy::Truncate => {
                        tracing::warn!(
                            document_type = %self.document_type,
                            page = current,
                            body = %body,
                            "List response has no '{}' collection, stopping",
                            self.document_type.collection_key()
                        );
                        self.truncated = true;
                        Ok(None)
                    }
                };
            }
        };

        if entries.is_empty() {
            tracing::debug!(
                document_type = %self.document_type,
                page = current,
                "Empty page, no more documents"
            );
            self.next = None;
            return Ok(None);
        }

        self.next = match &page_context {
            Some(ctx) => ctx.next_page(current),
            None => current.checked_add(1),
        };

        let summaries = entries
            .iter()
            .filter_map(|entry| {
                let summary = DocumentSummary::from_value(self.document_type, entry);
                if summary.is_none() {
                    tracing::warn!(
                        document_type = %self.document_type,
                        page = current,
                        "Skipping list entry without '{}'",
                        self.document_type.id_field()
                    );
                }
                summary
            })
            .collect::<Vec<_>>();

        tracing::info!(
            document_type = %self.document_type,
            page = current,
            count = summaries.len(),
            has_more = self.next.is_some(),
            "Fetched page"
        );

        Ok(Some(Page {
            number: current,
            summaries,
        }))
    }
}
