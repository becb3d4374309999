//! Sync orchestration
//!
//! - [`coordinator`] - [`SyncCoordinator`], one run across the configured types
//! - [`summary`] - per-type counters and recorded errors

pub mod coordinator;
pub mod summary;

pub use coordinator::{exit_code_for, SyncCoordinator};
pub use summary::{SyncError, SyncErrorType, SyncSummary, TypeSummary};
