//! Core pipeline logic
//!
//! # Modules
//!
//! - [`sync`] - run orchestration and the run summary
//! - [`transform`] - detail payload to table rows
//!
//! # Sync Workflow
//!
//! 1. **Authenticate**: exchange the refresh token for an access token
//! 2. **Prepare**: test the store connection and create missing tables
//! 3. **List**: page through each document type for the date window
//! 4. **Fetch**: load the detail of every listed document
//! 5. **Map**: flatten the detail into parent and line item rows
//! 6. **Persist**: write each document in its own transaction
//! 7. **Report**: log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use books_etl::adapters::database::create_document_store;
//! use books_etl::config::load_config;
//! use books_etl::core::sync::SyncCoordinator;
//! use books_etl::domain::SyncWindow;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config(None)?;
//! let store = create_document_store(&config)?;
//!
//! let coordinator = SyncCoordinator::new(config, store);
//! let summary = coordinator.run(SyncWindow::today()).await?;
//!
//! println!("Written: {}", summary.total_written());
//! println!("Failed: {}", summary.total_failed());
//! # Ok(())
//! # }
//! ```

pub mod sync;
pub mod transform;
