//! Domain error types
//!
//! The error hierarchy for the ETL run. Third-party error types (reqwest,
//! tokio-postgres, toml) are converted to strings at the boundary and never
//! appear in these enums.

use crate::domain::document::DocumentType;
use thiserror::Error;

/// Main error type used throughout the application
#[derive(Debug, Error)]
pub enum EtlError {
    /// A required setting is missing or invalid
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The OAuth token refresh did not yield an access token
    #[error("Authentication error: {0}")]
    Authentication(String),

    /// Accounting API errors
    #[error("Books API error: {0}")]
    Books(#[from] BooksApiError),

    /// Storage errors (connection, schema or write failures)
    #[error("Database error: {0}")]
    Database(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl EtlError {
    /// Process exit code for a run that ended with this error
    ///
    /// Configuration and authentication failures exit with 2, everything else
    /// with 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            EtlError::Configuration(_) | EtlError::Authentication(_) => 2,
            _ => 1,
        }
    }
}

/// Errors raised while talking to the accounting API
#[derive(Debug, Error)]
pub enum BooksApiError {
    /// Transport-level failure (DNS, TLS, timeout, reset)
    #[error("Failed to connect to Books API: {0}")]
    ConnectionFailed(String),

    /// Non-2xx HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Body was not the JSON we expected
    #[error("Invalid response from server: {0}")]
    InvalidResponse(String),

    /// Application-level error code embedded in a 2xx JSON body
    #[error("API returned code {code}: {message}")]
    ApiError { code: i64, message: String },

    /// A list response without its collection key
    #[error("List response for {document_type} page {page} has no '{}' collection: {body}", .document_type.collection_key())]
    UnexpectedListShape {
        document_type: DocumentType,
        page: u32,
        body: String,
    },
}

// Conversion from std::io::Error
impl From<std::io::Error> for EtlError {
    fn from(err: std::io::Error) -> Self {
        EtlError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for EtlError {
    fn from(err: serde_json::Error) -> Self {
        EtlError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for EtlError {
    fn from(err: toml::de::Error) -> Self {
        EtlError::Configuration(format!("TOML parse error: {err}"))
    }
}
