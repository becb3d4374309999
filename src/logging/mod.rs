//! Logging
//!
//! Structured logging through `tracing`, with an optional JSON rolling file.
//!
//! # Example
//!
//! ```no_run
//! use books_etl::config::LoggingConfig;
//! use books_etl::logging::init_logging;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use books_etl::domain::EtlError;
/// use books_etl::log_error_with_context;
///
/// let error = EtlError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}
