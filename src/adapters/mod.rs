//! External system integrations.
//!
//! - [`books`] - accounting API: token refresh, list pages, detail fetches
//! - [`database`] - storage trait, factory and dry-run store
//! - [`postgresql`] - PostgreSQL store
//!
//! The orchestrator only sees [`database::DocumentStore`] and the books
//! client, so tests can swap the store for an in-memory one and point the
//! client at a mock HTTP server.

pub mod books;
pub mod database;
pub mod postgresql;
