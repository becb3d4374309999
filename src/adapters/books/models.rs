//! Wire models for the accounting API
//!
//! List and detail bodies are kept as `serde_json::Value` because their shape
//! varies by document type; only the envelope fields are typed.

use crate::domain::{DocumentId, DocumentType};
use serde::Deserialize;
use serde_json::Value;

/// Body of the OAuth token endpoint
///
/// A refused refresh still answers 200 with `{"error": "..."}`, so every field
/// is optional.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub api_domain: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Pagination metadata returned with every list page
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PageContext {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub has_more_page: Option<bool>,
}

impl PageContext {
    /// Page to request after `current`, or `None` when the server says there
    /// are no more pages or the page number cannot advance
    pub fn next_page(&self, current: u32) -> Option<u32> {
        match self.has_more_page {
            Some(false) => None,
            _ => self.page.unwrap_or(current).checked_add(1),
        }
    }
}

/// One entry of a list page
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSummary {
    pub id: DocumentId,
    /// Human facing number (`invoice_number`, `bill_number`...), for logs
    pub number: Option<String>,
}

impl DocumentSummary {
    /// Reads a summary from a list entry, `None` if it carries no usable id
    pub fn from_value(document_type: DocumentType, value: &Value) -> Option<Self> {
        let id = match value.get(document_type.id_field())? {
            Value::String(s) => DocumentId::new(s.as_str()).ok()?,
            Value::Number(n) => DocumentId::new(n.to_string()).ok()?,
            _ => return None,
        };
        let number_field = match document_type {
            DocumentType::Invoice => "invoice_number",
            DocumentType::CreditNote => "creditnote_number",
            DocumentType::Bill => "bill_number",
        };
        let number = value
            .get(number_field)
            .and_then(Value::as_str)
            .map(str::to_string);
        Some(Self { id, number })
    }
}

/// A decoded list response
#[derive(Debug, Clone, PartialEq)]
pub enum ListResponse {
    /// The collection was present
    Page {
        entries: Vec<Value>,
        page_context: Option<PageContext>,
    },
    /// The body had no collection array, reported a non-zero `code`, or came
    /// with a non-2xx status
    Unexpected { body: String },
}

impl ListResponse {
    /// Decodes a 2xx list body
    pub fn from_body(document_type: DocumentType, body: &Value) -> Self {
        let code = body.get("code").and_then(Value::as_i64).unwrap_or(0);
        let entries = body
            .get(document_type.collection_key())
            .and_then(Value::as_array);

        match entries {
            Some(entries) if code == 0 => ListResponse::Page {
                entries: entries.clone(),
                page_context: body
                    .get("page_context")
                    .cloned()
                    .and_then(|ctx| serde_json::from_value(ctx).ok()),
            },
            _ => ListResponse::Unexpected {
                body: abbreviate(&body.to_string()),
            },
        }
    }
}

/// A page of summaries handed to the orchestrator
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub number: u32,
    pub summaries: Vec<DocumentSummary>,
}

const MAX_LOGGED_BODY: usize = 500;

/// Shortens a response body for error messages and logs
pub(crate) fn abbreviate(body: &str) -> String {
    if body.chars().count() <= MAX_LOGGED_BODY {
        return body.to_string();
    }
    let head: String = body.chars().take(MAX_LOGGED_BODY).collect();
    format!("{head}...")
}
