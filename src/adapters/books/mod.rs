//! Accounting API adapter
//!
//! Token refresh, paginated listing and per-document detail fetches against
//! the Books v3 REST API.

pub mod auth;
pub mod client;
pub mod models;
pub mod pager;

pub use auth::{AccessToken, TokenProvider};
pub use client::{build_http_client, BooksClient};
pub use models::{DocumentSummary, ListResponse, Page, PageContext};
pub use pager::DocumentPager;
