//! Store factory
//!
//! Picks the [`DocumentStore`] implementation from configuration.

use crate::adapters::database::dry_run::DryRunStore;
use crate::adapters::database::traits::DocumentStore;
use crate::adapters::postgresql::adapter::PostgresStore;
use crate::config::schema::{BooksEtlConfig, SUPPORTED_DRIVERS};
use crate::domain::{EtlError, Result};
use std::sync::Arc;

/// Create the store for this run
///
/// Dry runs get a [`DryRunStore`]. Otherwise `database.driver` selects the
/// backend.
///
/// # Errors
///
/// Returns a configuration error for an unsupported driver, or a database
/// error if the connection pool cannot be built.
pub fn create_document_store(config: &BooksEtlConfig) -> Result<Arc<dyn DocumentStore>> {
    if config.application.dry_run {
        tracing::info!("Dry run enabled, using logging store");
        return Ok(Arc::new(DryRunStore::new()));
    }

    match config.database.driver.as_str() {
        "postgresql" => {
            tracing::info!(
                host = %config.database.host,
                database = %config.database.database,
                "Creating PostgreSQL store"
            );
            let store = PostgresStore::new(config.database.clone())?;
            Ok(Arc::new(store))
        }
        other => Err(EtlError::Configuration(format!(
            "Unsupported driver '{other}'. Supported drivers: {}",
            SUPPORTED_DRIVERS.join(", ")
        ))),
    }
}
