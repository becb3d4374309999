//! Domain types for the books ETL.
//!
//! - Identifiers ([`DocumentId`], [`OrganizationId`])
//! - Document kinds and flattened rows ([`DocumentType`], [`FlatDocument`])
//! - Pipeline policies ([`WriteMode`], [`ListErrorPolicy`])
//! - Errors ([`EtlError`], [`BooksApiError`]) and the [`Result`] alias
//!
//! ```rust
//! use books_etl::domain::{DocumentId, DocumentType};
//!
//! # fn example() -> Result<(), String> {
//! let id = DocumentId::new("982000000567001")?;
//! assert_eq!(DocumentType::Bill.detail_key(), "bill");
//! # let _ = id;
//! # Ok(())
//! # }
//! ```

pub mod document;
pub mod errors;
pub mod ids;
pub mod result;

pub use document::{
    BillLineItemRow, BillRow, BillStatusFilter, DocumentType, FlatDocument, ListErrorPolicy,
    SalesDocumentRow, SalesLineItemRow, SyncWindow, WriteMode, WriteOutcome,
};
pub use errors::{BooksApiError, EtlError};
pub use ids::{DocumentId, OrganizationId};
pub use result::Result;
