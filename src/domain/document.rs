//! Financial document types and their flattened row shapes
//!
//! A synced document is either a sales document (invoice or credit note, which
//! share one column layout) or a purchase bill. [`FlatDocument`] is what the
//! mapper produces and what a store writes.

use super::ids::DocumentId;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// The three document collections pulled from the accounting API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentType {
    #[serde(rename = "invoices")]
    Invoice,
    #[serde(rename = "creditnotes")]
    CreditNote,
    #[serde(rename = "bills")]
    Bill,
}

impl DocumentType {
    /// Every type, in the order a run processes them
    pub const ALL: [DocumentType; 3] = [
        DocumentType::Invoice,
        DocumentType::CreditNote,
        DocumentType::Bill,
    ];

    /// Path segment under `/books/v3/`
    pub fn endpoint(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoices",
            DocumentType::CreditNote => "creditnotes",
            DocumentType::Bill => "bills",
        }
    }

    /// Key holding the array of summaries in a list response
    pub fn collection_key(&self) -> &'static str {
        self.endpoint()
    }

    /// Key holding the record in a detail response
    pub fn detail_key(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::CreditNote => "creditnote",
            DocumentType::Bill => "bill",
        }
    }

    /// Field carrying the document id in summaries and details
    pub fn id_field(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice_id",
            DocumentType::CreditNote => "creditnote_id",
            DocumentType::Bill => "bill_id",
        }
    }

    /// Parent table name
    pub fn table(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoices",
            DocumentType::CreditNote => "credit_notes",
            DocumentType::Bill => "bills",
        }
    }

    /// Child table name
    pub fn line_item_table(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice_line_items",
            DocumentType::CreditNote => "credit_note_line_items",
            DocumentType::Bill => "bill_line_items",
        }
    }

    /// Human readable name for logs and the run summary
    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoices",
            DocumentType::CreditNote => "Credit Notes",
            DocumentType::Bill => "Bills",
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

impl FromStr for DocumentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invoices" | "invoice" => Ok(DocumentType::Invoice),
            "creditnotes" | "creditnote" | "credit_notes" | "credit-notes" => {
                Ok(DocumentType::CreditNote)
            }
            "bills" | "bill" => Ok(DocumentType::Bill),
            other => Err(format!(
                "Unknown document type '{other}', expected one of: invoices, creditnotes, bills"
            )),
        }
    }
}

/// Status filter accepted by the bills list endpoint (`filter_by`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BillStatusFilter {
    #[serde(rename = "Status.All")]
    All,
    #[serde(rename = "Status.Open")]
    Open,
    #[serde(rename = "Status.Paid")]
    Paid,
    #[serde(rename = "Status.PartiallyPaid")]
    PartiallyPaid,
    #[serde(rename = "Status.Overdue")]
    Overdue,
    #[serde(rename = "Status.Void")]
    Void,
}

impl BillStatusFilter {
    /// Wire value for the `filter_by` query parameter
    pub fn as_query_value(&self) -> &'static str {
        match self {
            BillStatusFilter::All => "Status.All",
            BillStatusFilter::Open => "Status.Open",
            BillStatusFilter::Paid => "Status.Paid",
            BillStatusFilter::PartiallyPaid => "Status.PartiallyPaid",
            BillStatusFilter::Overdue => "Status.Overdue",
            BillStatusFilter::Void => "Status.Void",
        }
    }
}

impl fmt::Display for BillStatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query_value())
    }
}

impl FromStr for BillStatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Status.All" => Ok(BillStatusFilter::All),
            "Status.Open" => Ok(BillStatusFilter::Open),
            "Status.Paid" => Ok(BillStatusFilter::Paid),
            "Status.PartiallyPaid" => Ok(BillStatusFilter::PartiallyPaid),
            "Status.Overdue" => Ok(BillStatusFilter::Overdue),
            "Status.Void" => Ok(BillStatusFilter::Void),
            other => Err(format!(
                "Invalid bills status filter '{other}'. Must be one of: Status.All, Status.Open, \
                 Status.Paid, Status.PartiallyPaid, Status.Overdue, Status.Void"
            )),
        }
    }
}

/// How a document is written when it is synced again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Update-or-insert the parent, then replace all of its line items
    #[default]
    Merge,
    /// Insert parent and line items unconditionally
    Append,
}

impl fmt::Display for WriteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteMode::Merge => write!(f, "merge"),
            WriteMode::Append => write!(f, "append"),
        }
    }
}

/// What the lister does with a list response that lacks its collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListErrorPolicy {
    /// Fail the run
    Abort,
    /// Log and stop paging this type
    Truncate,
}

impl fmt::Display for ListErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListErrorPolicy::Abort => write!(f, "abort"),
            ListErrorPolicy::Truncate => write!(f, "truncate"),
        }
    }
}

/// Parent row shared by invoices and credit notes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesDocumentRow {
    pub document_id: DocumentId,
    pub customer_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
    pub billing_address: Option<Value>,
    pub shipping_address: Option<Value>,
    pub custom_fields: Option<Value>,
    pub taxes: Option<Value>,
    pub billing_state: Option<String>,
    pub shipping_state: Option<String>,
}

/// Line item of an invoice or credit note
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesLineItemRow {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub item_total: Option<Decimal>,
    pub item_tax: Option<Value>,
}

/// Parent row of a purchase bill
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillRow {
    pub bill_id: DocumentId,
    pub vendor_name: Option<String>,
    pub date: Option<NaiveDate>,
    pub status: Option<String>,
    pub total: Option<Decimal>,
    pub currency: Option<String>,
    pub place_of_supply: Option<String>,
    pub billing_address: Option<Value>,
    pub shipping_address: Option<Value>,
    pub notes: Option<String>,
    pub terms: Option<String>,
    pub billing_state: Option<String>,
    pub shipping_state: Option<String>,
    pub created_time: Option<DateTime<Utc>>,
    pub last_modified_time: Option<DateTime<Utc>>,
}

/// Line item of a bill; only the first tax on the line is kept
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillLineItemRow {
    pub item_name: Option<String>,
    pub description: Option<String>,
    pub rate: Option<Decimal>,
    pub quantity: Option<Decimal>,
    pub amount: Option<Decimal>,
    pub item_total: Option<Decimal>,
    pub tax_name: Option<String>,
    pub tax_percentage: Option<Decimal>,
    pub account_id: Option<String>,
    pub account_name: Option<String>,
}

/// A document flattened for storage, with its line items
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FlatDocument {
    Sales {
        document_type: DocumentType,
        row: SalesDocumentRow,
        line_items: Vec<SalesLineItemRow>,
    },
    Bill {
        row: BillRow,
        line_items: Vec<BillLineItemRow>,
    },
}

impl FlatDocument {
    pub fn document_type(&self) -> DocumentType {
        match self {
            FlatDocument::Sales { document_type, .. } => *document_type,
            FlatDocument::Bill { .. } => DocumentType::Bill,
        }
    }

    pub fn document_id(&self) -> &DocumentId {
        match self {
            FlatDocument::Sales { row, .. } => &row.document_id,
            FlatDocument::Bill { row, .. } => &row.bill_id,
        }
    }

    pub fn line_item_count(&self) -> usize {
        match self {
            FlatDocument::Sales { line_items, .. } => line_items.len(),
            FlatDocument::Bill { line_items, .. } => line_items.len(),
        }
    }
}

/// Inclusive date range passed to the list endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SyncWindow {
    /// Window covering only the local calendar day
    pub fn today() -> Self {
        Self::single_day(chrono::Local::now().date_naive())
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: day,
            end: day,
        }
    }

    /// `date_start` query value
    pub fn start_param(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// `date_end` query value
    pub fn end_param(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

/// Result of writing one document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOutcome {
    /// True when an existing parent row was updated rather than inserted
    pub updated: bool,
    /// Line item rows removed before the insert (merge mode only)
    pub line_items_deleted: u64,
    /// Line item rows inserted
    pub line_items_inserted: usize,
}
