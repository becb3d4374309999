//! Record mapper
//!
//! Flattens a detail record into the parent row and line-item rows that the
//! store writes. Mapping never fails: a field that is missing or has the wrong
//! shape becomes `None`.

use super::dates::{parse_date, parse_datetime};
use crate::domain::{
    BillLineItemRow, BillRow, DocumentId, DocumentType, FlatDocument, SalesDocumentRow,
    SalesLineItemRow,
};
use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

const MONEY_SCALE: u32 = 2;
const QUANTITY_SCALE: u32 = 4;
const PERCENT_SCALE: u32 = 2;

/// Flattens a detail record
///
/// `id` is the id the document was listed under and becomes the row key.
///
/// # Examples
///
/// ```
/// use books_etl::core::transform::flatten;
/// use books_etl::domain::{DocumentId, DocumentType, FlatDocument};
/// use serde_json::json;
///
/// let detail = json!({
///     "bill_id": "B1",
///     "vendor_name": "Acme Supplies",
///     "total": 1180.0,
///     "billing_address": {"city": "Pune"},
///     "line_items": []
/// });
/// let id = DocumentId::new("B1").unwrap();
/// match flatten(DocumentType::Bill, &id, &detail) {
///     FlatDocument::Bill { row, line_items } => {
///         assert_eq!(row.vendor_name.as_deref(), Some("Acme Supplies"));
///         assert_eq!(row.billing_state, None);
///         assert!(line_items.is_empty());
///     }
///     _ => unreachable!(),
/// }
/// ```
pub fn flatten(document_type: DocumentType, id: &DocumentId, detail: &Value) -> FlatDocument {
    match document_type {
        DocumentType::Invoice | DocumentType::CreditNote => FlatDocument::Sales {
            document_type,
            row: sales_row(id, detail),
            line_items: line_items(detail).map(sales_line_item).collect(),
        },
        DocumentType::Bill => FlatDocument::Bill {
            row: bill_row(id, detail),
            line_items: line_items(detail).map(bill_line_item).collect(),
        },
    }
}

fn sales_row(id: &DocumentId, doc: &Value) -> SalesDocumentRow {
    SalesDocumentRow {
        document_id: id.clone(),
        customer_name: text(doc, "customer_name"),
        date: parse_date(doc.get("date")),
        status: text(doc, "status"),
        total: decimal(doc, "total", MONEY_SCALE),
        currency: text(doc, "currency_code"),
        billing_address: blob(doc, "billing_address"),
        shipping_address: blob(doc, "shipping_address"),
        custom_fields: blob(doc, "custom_fields"),
        taxes: blob(doc, "taxes"),
        billing_state: state_of(doc, "billing_address"),
        shipping_state: state_of(doc, "shipping_address"),
    }
}

fn sales_line_item(item: &Value) -> SalesLineItemRow {
    SalesLineItemRow {
        item_name: text(item, "name"),
        description: text(item, "description"),
        rate: decimal(item, "rate", MONEY_SCALE),
        quantity: decimal(item, "quantity", QUANTITY_SCALE),
        amount: decimal(item, "amount", MONEY_SCALE),
        item_total: decimal(item, "item_total", MONEY_SCALE),
        item_tax: blob(item, "taxes"),
    }
}

fn bill_row(id: &DocumentId, doc: &Value) -> BillRow {
    BillRow {
        bill_id: id.clone(),
        vendor_name: text(doc, "vendor_name"),
        date: parse_date(doc.get("date")),
        status: text(doc, "status"),
        total: decimal(doc, "total", MONEY_SCALE),
        currency: text(doc, "currency_code"),
        place_of_supply: text(doc, "place_of_supply"),
        billing_address: blob(doc, "billing_address"),
        shipping_address: blob(doc, "shipping_address"),
        notes: text(doc, "notes"),
        terms: text(doc, "terms"),
        billing_state: state_of(doc, "billing_address"),
        shipping_state: state_of(doc, "shipping_address"),
        created_time: parse_datetime(doc.get("created_time")),
        last_modified_time: parse_datetime(doc.get("last_modified_time")),
    }
}

fn bill_line_item(item: &Value) -> BillLineItemRow {
    // Only the first tax on a line is kept.
    let first_tax = item
        .get("taxes")
        .and_then(Value::as_array)
        .and_then(|taxes| taxes.first());

    BillLineItemRow {
        item_name: text(item, "name"),
        description: text(item, "description"),
        rate: decimal(item, "rate", MONEY_SCALE),
        quantity: decimal(item, "quantity", QUANTITY_SCALE),
        amount: decimal(item, "amount", MONEY_SCALE),
        item_total: decimal(item, "item_total", MONEY_SCALE),
        tax_name: first_tax.and_then(|tax| text(tax, "tax_name").or_else(|| text(tax, "name"))),
        tax_percentage: first_tax.and_then(|tax| {
            decimal(tax, "tax_percentage", PERCENT_SCALE)
                .or_else(|| decimal(tax, "percentage", PERCENT_SCALE))
        }),
        account_id: text(item, "account_id"),
        account_name: text(item, "account_name"),
    }
}

fn line_items(doc: &Value) -> impl Iterator<Item = &Value> {
    doc.get("line_items")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter(|item| item.is_object())
}

/// Scalar as text; numbers and booleans are rendered, null and containers are absent
fn text(value: &Value, key: &str) -> Option<String> {
    match value.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Number or numeric string, rounded half away from zero to `scale` places
fn decimal(value: &Value, key: &str, scale: u32) -> Option<Decimal> {
    let raw = match value.get(key)? {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', ""),
        _ => return None,
    };
    Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .ok()
        .map(|d| d.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
}

/// Nested structure kept as JSON; null is absent
fn blob(value: &Value, key: &str) -> Option<Value> {
    match value.get(key)? {
        Value::Null => None,
        other => Some(other.clone()),
    }
}

/// `state` of an address object; missing address, missing key or blank value is absent
fn state_of(value: &Value, address_key: &str) -> Option<String> {
    value
        .get(address_key)
        .and_then(|address| address.get("state"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
