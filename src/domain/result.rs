//! Result type alias
//!
//! Convenience alias with [`EtlError`] as the error type.

use super::errors::EtlError;

/// Result type alias for fallible ETL operations
///
/// # Examples
///
/// ```
/// use books_etl::domain::result::Result;
/// use books_etl::domain::errors::EtlError;
///
/// fn failing_function() -> Result<()> {
///     Err(EtlError::Configuration("SQL_SERVER is not set".to_string()))
/// }
/// assert!(failing_function().is_err());
/// ```
pub type Result<T> = std::result::Result<T, EtlError>;
