//! PostgreSQL backend
//!
//! - [`client`] - connection pool, connection test, schema setup
//! - [`writer`] - merge and append SQL
//! - [`adapter`] - [`PostgresStore`], the `DocumentStore` implementation

pub mod adapter;
pub mod client;
pub mod writer;

pub use adapter::PostgresStore;
pub use client::PostgresClient;
