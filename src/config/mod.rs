//! Configuration management.
//!
//! Configuration comes from an optional TOML file, `${VAR}` placeholders in
//! that file, and environment overrides, in that order. The result is an
//! explicit [`BooksEtlConfig`] value handed to each component.
//!
//! # Sections
//!
//! - [`ApplicationConfig`] - log level, dry run
//! - [`BooksConfig`] - OAuth credentials, organization, paging and timeouts
//! - [`DatabaseConfig`] - PostgreSQL connection and pool settings
//! - [`SyncConfig`] - document types and per-type list/write policies
//! - [`LoggingConfig`] - optional rolling JSON log files
//!
//! # Example Configuration
//!
//! ```toml
//! [books]
//! organization_id = "60012345678"
//! client_id = "1000.XXXXXXXX"
//! client_secret = "${ZOHO_CLIENT_SECRET}"
//! refresh_token = "${ZOHO_REFRESH_TOKEN}"
//! redirect_uri = "https://example.com/oauth/callback"
//!
//! [database]
//! host = "localhost"
//! database = "books"
//! username = "etl"
//! password = "${SQL_PASSWORD}"
//!
//! [sync.bills]
//! on_list_error = "abort"
//! write_mode = "merge"
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, BooksConfig, BooksEtlConfig, DatabaseConfig, LoggingConfig,
    PipelineConfig, SyncConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
