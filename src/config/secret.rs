//! Credential wrappers built on the secrecy crate
//!
//! The OAuth refresh token, the OAuth client secret, the short-lived access
//! token and the database password are all held as [`SecretString`]. The inner
//! buffer is zeroed on drop and `Debug` output is redacted, so a stray
//! `?config` in a log line cannot leak a credential.
//!
//! # Example
//!
//! ```rust
//! use books_etl::config::secret_string;
//! use secrecy::ExposeSecret;
//!
//! let token = secret_string("1000.abc.def".to_string());
//! assert_eq!(token.expose_secret().as_str(), "1000.abc.def");
//! assert!(!format!("{token:?}").contains("1000.abc.def"));
//! ```

use secrecy::{CloneableSecret, DebugSecret, Secret, SerializableSecret};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use zeroize::Zeroize;

/// String buffer that is wiped when dropped
#[derive(Clone, Debug, Zeroize)]
#[zeroize(drop)]
pub struct SecretValue(String);

impl CloneableSecret for SecretValue {}
impl DebugSecret for SecretValue {}
impl SerializableSecret for SecretValue {}

impl From<String> for SecretValue {
    fn from(s: String) -> Self {
        SecretValue(s)
    }
}

impl PartialEq<str> for SecretValue {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl AsRef<str> for SecretValue {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl SecretValue {
    /// Borrow the wrapped string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the value is empty or only whitespace
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl Serialize for SecretValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SecretValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(SecretValue)
    }
}

/// A zeroizing, debug-redacted string
pub type SecretString = Secret<SecretValue>;

/// Wraps a plain string as a [`SecretString`]
#[inline]
pub fn secret_string(value: String) -> SecretString {
    Secret::new(SecretValue::from(value))
}

/// Returns true when the optional secret is missing or blank
pub fn secret_is_missing(value: &Option<SecretString>) -> bool {
    use secrecy::ExposeSecret;
    value.as_ref().map_or(true, |s| s.expose_secret().is_blank())
}
