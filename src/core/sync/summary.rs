//! Run summary and reporting

use crate::domain::DocumentType;
use std::time::Duration;

/// Counters for one document type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSummary {
    pub document_type: DocumentType,

    /// List pages that returned documents
    pub pages: usize,

    /// Summaries seen across all pages
    pub listed: usize,

    /// Documents committed to the store
    pub written: usize,

    /// Documents whose detail could not be fetched or was empty
    pub skipped: usize,

    /// Documents whose write failed
    pub failed: usize,

    /// Line item rows inserted
    pub line_items_written: usize,

    /// Paging stopped on a malformed list page
    pub truncated: bool,
}

impl TypeSummary {
    pub fn new(document_type: DocumentType) -> Self {
        Self {
            document_type,
            pages: 0,
            listed: 0,
            written: 0,
            skipped: 0,
            failed: 0,
            line_items_written: 0,
            truncated: false,
        }
    }
}

/// Category of a recorded error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncErrorType {
    /// Token refresh failed
    Authentication,
    /// A list page failed or was malformed
    List,
    /// A detail fetch failed
    DetailFetch,
    /// A document write failed
    Persistence,
    /// Connection test or schema setup failed
    Storage,
}

/// Error with context, kept for the summary
#[derive(Debug, Clone)]
pub struct SyncError {
    pub error_type: SyncErrorType,
    pub message: String,
    /// e.g. `bills/B1`
    pub context: Option<String>,
}

impl SyncError {
    pub fn new(error_type: SyncErrorType, message: impl Into<String>) -> Self {
        Self {
            error_type,
            message: message.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Outcome of one sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    pub run_id: String,
    pub dry_run: bool,
    pub types: Vec<TypeSummary>,
    pub errors: Vec<SyncError>,
    pub duration: Duration,
    /// Set when a run-level error stopped the run early
    pub run_error: Option<String>,
}

impl SyncSummary {
    pub fn new(run_id: impl Into<String>, dry_run: bool) -> Self {
        Self {
            run_id: run_id.into(),
            dry_run,
            types: Vec::new(),
            errors: Vec::new(),
            duration: Duration::ZERO,
            run_error: None,
        }
    }

    /// Counters for `document_type`, created on first use
    pub fn type_mut(&mut self, document_type: DocumentType) -> &mut TypeSummary {
        let index = match self
            .types
            .iter()
            .position(|t| t.document_type == document_type)
        {
            Some(index) => index,
            None => {
                self.types.push(TypeSummary::new(document_type));
                self.types.len() - 1
            }
        };
        &mut self.types[index]
    }

    pub fn get(&self, document_type: DocumentType) -> Option<&TypeSummary> {
        self.types.iter().find(|t| t.document_type == document_type)
    }

    pub fn add_error(&mut self, error: SyncError) {
        self.errors.push(error);
    }

    pub fn total_written(&self) -> usize {
        self.types.iter().map(|t| t.written).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.types.iter().map(|t| t.failed).sum()
    }

    pub fn total_skipped(&self) -> usize {
        self.types.iter().map(|t| t.skipped).sum()
    }

    /// No run-level error and no failed writes
    pub fn is_successful(&self) -> bool {
        self.run_error.is_none() && self.total_failed() == 0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        for t in &self.types {
            tracing::info!(
                document_type = %t.document_type,
                pages = t.pages,
                listed = t.listed,
                written = t.written,
                skipped = t.skipped,
                failed = t.failed,
                line_items = t.line_items_written,
                truncated = t.truncated,
                "{} synced",
                t.document_type.label()
            );
        }

        tracing::info!(
            run_id = %self.run_id,
            dry_run = self.dry_run,
            written = self.total_written(),
            skipped = self.total_skipped(),
            failed = self.total_failed(),
            duration_secs = self.duration.as_secs_f64(),
            "Sync completed"
        );

        if let Some(run_error) = &self.run_error {
            tracing::error!(run_id = %self.run_id, error = %run_error, "Sync stopped early");
        }

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sync completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    error_type = ?error.error_type,
                    context = error.context.as_deref().unwrap_or(""),
                    message = %error.message,
                    "Sync error"
                );
            }
        }
    }
}
