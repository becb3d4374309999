//! Data transformation
//!
//! Turns nested detail records into flat rows:
//!
//! - [`mapper`] - document and line-item flattening
//! - [`dates`] - lenient date and timestamp parsing

pub mod dates;
pub mod mapper;

pub use mapper::flatten;
