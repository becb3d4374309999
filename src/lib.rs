// books-etl - Zoho Books to PostgreSQL ETL Tool
// Copyright (c) 2025 books-etl Contributors
// Licensed under the MIT License

//! # books-etl - Zoho Books to PostgreSQL ETL
//!
//! books-etl copies the invoices, credit notes and purchase bills dated today
//! from the Zoho Books REST API into relational tables, one parent row per
//! document and one child row per line item.
//!
//! ## Overview
//!
//! - **Authenticating** with an OAuth refresh token at the start of every run
//! - **Listing** each document type page by page for the date window
//! - **Fetching** the detail of every listed document
//! - **Mapping** the detail into typed rows with best-effort parsing
//! - **Persisting** each document in its own transaction, merge or append
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Sync orchestration and record mapping
//! - [`adapters`] - External integrations (Books API, PostgreSQL)
//! - [`domain`] - Document types, rows, ids and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use books_etl::adapters::database::create_document_store;
//! use books_etl::config::load_config;
//! use books_etl::core::sync::SyncCoordinator;
//! use books_etl::domain::SyncWindow;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config(Some("books-etl.toml".as_ref()))?;
//!     let store = create_document_store(&config)?;
//!
//!     let summary = SyncCoordinator::new(config, store)
//!         .run(SyncWindow::today())
//!         .await?;
//!
//!     println!("Wrote {} documents", summary.total_written());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error is
//! [`domain::EtlError`]. [`domain::EtlError::exit_code`] maps each error to
//! the process exit code.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
