//! SQL for writing flattened documents
//!
//! All functions run inside the caller's transaction. Table and column names
//! come from [`DocumentType`] constants, never from input data.

use crate::domain::{
    BillLineItemRow, BillRow, DocumentType, EtlError, FlatDocument, Result, SalesDocumentRow,
    SalesLineItemRow, WriteMode, WriteOutcome,
};
use tokio_postgres::types::ToSql;
use tokio_postgres::Transaction;

type Param<'a> = &'a (dyn ToSql + Sync);

const SALES_COLUMNS: &[&str] = &[
    "customer_name",
    "date",
    "status",
    "total",
    "currency",
    "billing_address",
    "shipping_address",
    "custom_fields",
    "taxes",
    "billing_state",
    "shipping_state",
];

const BILL_COLUMNS: &[&str] = &[
    "vendor_name",
    "date",
    "status",
    "total",
    "currency",
    "place_of_supply",
    "billing_address",
    "shipping_address",
    "notes",
    "terms",
    "billing_state",
    "shipping_state",
    "created_time",
    "last_modified_time",
];

const SALES_LINE_COLUMNS: &[&str] = &[
    "item_name",
    "description",
    "rate",
    "quantity",
    "amount",
    "item_total",
    "item_tax",
];

const BILL_LINE_COLUMNS: &[&str] = &[
    "item_name",
    "description",
    "rate",
    "quantity",
    "amount",
    "item_total",
    "tax_name",
    "tax_percentage",
    "account_id",
    "account_name",
];

/// `UPDATE {table} SET c1 = $2, ... WHERE {id} = $1`
fn update_sql(table: &str, id_column: &str, columns: &[&str]) -> String {
    let assignments = columns
        .iter()
        .enumerate()
        .map(|(i, column)| format!("{column} = ${}", i + 2))
        .collect::<Vec<_>>()
        .join(", ");
    format!("UPDATE {table} SET {assignments}, synced_at = NOW() WHERE {id_column} = $1")
}

/// `INSERT INTO {table} ({id}, c1, ...) VALUES ($1, $2, ...)`
fn insert_sql(table: &str, id_column: &str, columns: &[&str]) -> String {
    let placeholders = (1..=columns.len() + 1)
        .map(|i| format!("${i}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "INSERT INTO {table} ({id_column}, {}) VALUES ({placeholders})",
        columns.join(", ")
    )
}

fn sales_params<'a>(id: &'a &'a str, row: &'a SalesDocumentRow) -> [Param<'a>; 12] {
    [
        id,
        &row.customer_name,
        &row.date,
        &row.status,
        &row.total,
        &row.currency,
        &row.billing_address,
        &row.shipping_address,
        &row.custom_fields,
        &row.taxes,
        &row.billing_state,
        &row.shipping_state,
    ]
}

fn bill_params<'a>(id: &'a &'a str, row: &'a BillRow) -> [Param<'a>; 15] {
    [
        id,
        &row.vendor_name,
        &row.date,
        &row.status,
        &row.total,
        &row.currency,
        &row.place_of_supply,
        &row.billing_address,
        &row.shipping_address,
        &row.notes,
        &row.terms,
        &row.billing_state,
        &row.shipping_state,
        &row.created_time,
        &row.last_modified_time,
    ]
}

fn sales_line_params<'a>(parent: &'a &'a str, item: &'a SalesLineItemRow) -> [Param<'a>; 8] {
    [
        parent,
        &item.item_name,
        &item.description,
        &item.rate,
        &item.quantity,
        &item.amount,
        &item.item_total,
        &item.item_tax,
    ]
}

fn bill_line_params<'a>(parent: &'a &'a str, item: &'a BillLineItemRow) -> [Param<'a>; 11] {
    [
        parent,
        &item.item_name,
        &item.description,
        &item.rate,
        &item.quantity,
        &item.amount,
        &item.item_total,
        &item.tax_name,
        &item.tax_percentage,
        &item.account_id,
        &item.account_name,
    ]
}

fn db_error(action: &str, table: &str, e: tokio_postgres::Error) -> EtlError {
    EtlError::Database(format!("Failed to {action} {table}: {e}"))
}

/// Parent table, id column and parameters of a document
fn parent_statement_parts<'a>(
    document: &'a FlatDocument,
    id: &'a &'a str,
) -> (DocumentType, &'static [&'static str], Vec<Param<'a>>) {
    match document {
        FlatDocument::Sales {
            document_type, row, ..
        } => (*document_type, SALES_COLUMNS, sales_params(id, row).to_vec()),
        FlatDocument::Bill { row, .. } => {
            (DocumentType::Bill, BILL_COLUMNS, bill_params(id, row).to_vec())
        }
    }
}

/// Update the parent row if present, insert it otherwise
///
/// Returns true when an existing row was updated.
pub async fn upsert_document(tx: &Transaction<'_>, document: &FlatDocument) -> Result<bool> {
    let id = document.document_id().as_str();
    let (document_type, columns, params) = parent_statement_parts(document, &id);
    let table = document_type.table();
    let id_column = document_type.id_field();

    let update = update_sql(table, id_column, columns);
    let updated = tx
        .execute(update.as_str(), &params)
        .await
        .map_err(|e| db_error("update", table, e))?;

    if updated > 0 {
        return Ok(true);
    }

    let insert = insert_sql(table, id_column, columns);
    tx.execute(insert.as_str(), &params)
        .await
        .map_err(|e| db_error("insert into", table, e))?;
    Ok(false)
}

/// Insert the parent row unconditionally
pub async fn insert_document(tx: &Transaction<'_>, document: &FlatDocument) -> Result<()> {
    let id = document.document_id().as_str();
    let (document_type, columns, params) = parent_statement_parts(document, &id);
    let table = document_type.table();

    let insert = insert_sql(table, document_type.id_field(), columns);
    tx.execute(insert.as_str(), &params)
        .await
        .map_err(|e| db_error("insert into", table, e))?;
    Ok(())
}

/// Insert every line item of the document, returning how many were written
pub async fn insert_line_items(tx: &Transaction<'_>, document: &FlatDocument) -> Result<usize> {
    let parent = document.document_id().as_str();
    let document_type = document.document_type();
    let table = document_type.line_item_table();
    let parent_column = document_type.id_field();

    match document {
        FlatDocument::Sales { line_items, .. } => {
            if line_items.is_empty() {
                return Ok(0);
            }
            let statement = tx
                .prepare(insert_sql(table, parent_column, SALES_LINE_COLUMNS).as_str())
                .await
                .map_err(|e| db_error("prepare insert into", table, e))?;
            for item in line_items {
                tx.execute(&statement, &sales_line_params(&parent, item))
                    .await
                    .map_err(|e| db_error("insert into", table, e))?;
            }
            Ok(line_items.len())
        }
        FlatDocument::Bill { line_items, .. } => {
            if line_items.is_empty() {
                return Ok(0);
            }
            let statement = tx
                .prepare(insert_sql(table, parent_column, BILL_LINE_COLUMNS).as_str())
                .await
                .map_err(|e| db_error("prepare insert into", table, e))?;
            for item in line_items {
                tx.execute(&statement, &bill_line_params(&parent, item))
                    .await
                    .map_err(|e| db_error("insert into", table, e))?;
            }
            Ok(line_items.len())
        }
    }
}

/// Delete the stored line items of the parent, then insert the new set
///
/// Returns `(deleted, inserted)`.
pub async fn replace_line_items(
    tx: &Transaction<'_>,
    document: &FlatDocument,
) -> Result<(u64, usize)> {
    let parent = document.document_id().as_str();
    let document_type = document.document_type();
    let table = document_type.line_item_table();

    let delete = format!(
        "DELETE FROM {table} WHERE {} = $1",
        document_type.id_field()
    );
    let deleted = tx
        .execute(delete.as_str(), &[&parent])
        .await
        .map_err(|e| db_error("delete from", table, e))?;

    let inserted = insert_line_items(tx, document).await?;
    Ok((deleted, inserted))
}

/// Write one document according to `mode`
pub async fn write_document(
    tx: &Transaction<'_>,
    document: &FlatDocument,
    mode: WriteMode,
) -> Result<WriteOutcome> {
    match mode {
        WriteMode::Merge => {
            let updated = upsert_document(tx, document).await?;
            let (line_items_deleted, line_items_inserted) =
                replace_line_items(tx, document).await?;
            Ok(WriteOutcome {
                updated,
                line_items_deleted,
                line_items_inserted,
            })
        }
        WriteMode::Append => {
            insert_document(tx, document).await?;
            let line_items_inserted = insert_line_items(tx, document).await?;
            Ok(WriteOutcome {
                updated: false,
                line_items_deleted: 0,
                line_items_inserted,
            })
        }
    }
}
