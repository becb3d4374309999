//! Domain identifier types with validation
//!
//! Newtype wrappers for the identifiers the accounting API hands out. Each type
//! rejects blank values so an empty id can never reach a SQL statement or a URL.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single financial document (invoice, credit note or bill)
///
/// The value is the opaque external id assigned by the accounting system and is
/// the key every table row is written under.
///
/// # Examples
///
/// ```
/// use books_etl::domain::ids::DocumentId;
/// use std::str::FromStr;
///
/// let id = DocumentId::from_str("982000000567001").unwrap();
/// assert_eq!(id.as_str(), "982000000567001");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId, trimming surrounding whitespace
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty after trimming.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the document id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Tenant identifier scoping every API call to one accounting organization
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OrganizationId(String);

impl OrganizationId {
    /// Creates a new OrganizationId
    ///
    /// # Errors
    ///
    /// Returns an error if the id is blank or contains non-digit characters.
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err("Organization ID cannot be empty".to_string());
        }
        if !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(format!(
                "Organization ID must be numeric, got: {trimmed}"
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the organization id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrganizationId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
