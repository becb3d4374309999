//! Storage abstraction layer
//!
//! [`DocumentStore`] is the seam between the orchestrator and a concrete
//! backend; [`create_document_store`] builds the one the configuration asks for.

pub mod dry_run;
pub mod factory;
pub mod traits;

pub use dry_run::DryRunStore;
pub use factory::create_document_store;
pub use traits::DocumentStore;
