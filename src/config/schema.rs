//! Configuration schema types
//!
//! Every section defaults, so a run can be configured from environment
//! variables alone. Required values are checked by [`BooksEtlConfig::validate`].

use crate::config::secret::{secret_is_missing, SecretString};
use crate::domain::{BillStatusFilter, DocumentType, ListErrorPolicy, OrganizationId, WriteMode};
use serde::{Deserialize, Serialize};

/// Root configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BooksEtlConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Accounting API connection and OAuth credentials
    #[serde(default)]
    pub books: BooksConfig,

    /// Relational store connection
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Which document types to sync and how
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl BooksEtlConfig {
    /// Validates the configuration
    ///
    /// Every missing required setting is reported in one message.
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid section, or the full
    /// list of missing settings.
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;

        let mut missing = Vec::new();
        self.books.collect_missing(&mut missing);
        self.database.collect_missing(&mut missing);
        if !missing.is_empty() {
            return Err(format!(
                "Missing required settings: {}",
                missing.join(", ")
            ));
        }

        self.books.validate()?;
        self.database.validate()?;
        self.sync.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Run the full pipeline but log writes instead of executing them
    #[serde(default)]
    pub dry_run: bool,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

/// Accounting API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksConfig {
    /// OAuth token endpoint
    #[serde(default = "default_accounts_url")]
    pub accounts_url: String,

    /// API base used when the token response carries no `api_domain`
    #[serde(default = "default_api_domain")]
    pub default_api_domain: String,

    /// Organization the documents belong to
    #[serde(default)]
    pub organization_id: String,

    /// Long-lived OAuth refresh token
    #[serde(default)]
    pub refresh_token: Option<SecretString>,

    /// OAuth client id
    #[serde(default)]
    pub client_id: String,

    /// OAuth client secret
    #[serde(default)]
    pub client_secret: Option<SecretString>,

    /// Redirect URI registered with the OAuth client
    #[serde(default)]
    pub redirect_uri: String,

    /// Timeout applied to every HTTP request
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Page size for list calls
    #[serde(default = "default_per_page")]
    pub per_page: u32,

    /// Pause after each processed summary
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Optional `filter_by` value for the bills list
    #[serde(default)]
    pub bills_status_filter: Option<BillStatusFilter>,
}

impl BooksConfig {
    fn collect_missing(&self, missing: &mut Vec<&'static str>) {
        if secret_is_missing(&self.refresh_token) {
            missing.push("books.refresh_token (ZOHO_REFRESH_TOKEN)");
        }
        if self.client_id.trim().is_empty() {
            missing.push("books.client_id (ZOHO_CLIENT_ID)");
        }
        if secret_is_missing(&self.client_secret) {
            missing.push("books.client_secret (ZOHO_CLIENT_SECRET)");
        }
        if self.redirect_uri.trim().is_empty() {
            missing.push("books.redirect_uri (ZOHO_REDIRECT_URI)");
        }
        if self.organization_id.trim().is_empty() {
            missing.push("books.organization_id (ZOHO_ORGANIZATION_ID)");
        }
    }

    fn validate(&self) -> Result<(), String> {
        OrganizationId::new(self.organization_id.as_str())?;

        for (name, value) in [
            ("books.accounts_url", &self.accounts_url),
            ("books.default_api_domain", &self.default_api_domain),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                return Err(format!(
                    "{name} must start with http:// or https://, got '{value}'"
                ));
            }
        }

        if self.timeout_seconds == 0 {
            return Err("books.timeout_seconds must be > 0".to_string());
        }

        if self.per_page == 0 || self.per_page > 200 {
            return Err(format!(
                "books.per_page must be between 1 and 200, got {}",
                self.per_page
            ));
        }

        Ok(())
    }

    /// Parsed organization id
    ///
    /// # Errors
    ///
    /// Returns an error if the configured value is blank or not numeric.
    pub fn organization(&self) -> Result<OrganizationId, String> {
        OrganizationId::new(self.organization_id.as_str())
    }
}

impl Default for BooksConfig {
    fn default() -> Self {
        Self {
            accounts_url: default_accounts_url(),
            default_api_domain: default_api_domain(),
            organization_id: String::new(),
            refresh_token: None,
            client_id: String::new(),
            client_secret: None,
            redirect_uri: String::new(),
            timeout_seconds: default_timeout_seconds(),
            per_page: default_per_page(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            bills_status_filter: None,
        }
    }
}

/// Relational store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Storage backend; only `postgresql` is supported
    #[serde(default = "default_driver")]
    pub driver: String,

    #[serde(default)]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Database name
    #[serde(default)]
    pub database: String,

    #[serde(default)]
    pub username: String,

    /// Stored securely in memory and zeroized on drop
    #[serde(default)]
    pub password: Option<SecretString>,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: usize,

    /// Pool wait/create timeout in seconds
    #[serde(default = "default_connection_timeout_seconds")]
    pub connection_timeout_seconds: u64,

    /// Per-transaction statement timeout in seconds
    #[serde(default = "default_statement_timeout_seconds")]
    pub statement_timeout_seconds: u64,
}

/// Drivers the store factory knows how to build
pub const SUPPORTED_DRIVERS: [&str; 1] = ["postgresql"];

impl DatabaseConfig {
    fn collect_missing(&self, missing: &mut Vec<&'static str>) {
        if self.host.trim().is_empty() {
            missing.push("database.host (SQL_SERVER)");
        }
        if self.database.trim().is_empty() {
            missing.push("database.database (SQL_DATABASE)");
        }
        if self.username.trim().is_empty() {
            missing.push("database.username (SQL_USERNAME)");
        }
        if secret_is_missing(&self.password) {
            missing.push("database.password (SQL_PASSWORD)");
        }
    }

    fn validate(&self) -> Result<(), String> {
        if !SUPPORTED_DRIVERS.contains(&self.driver.as_str()) {
            return Err(format!(
                "Unsupported database.driver '{}'. Must be one of: {}",
                self.driver,
                SUPPORTED_DRIVERS.join(", ")
            ));
        }

        if self.max_connections == 0 || self.max_connections > 100 {
            return Err(format!(
                "database.max_connections must be between 1 and 100, got {}",
                self.max_connections
            ));
        }

        if self.statement_timeout_seconds == 0 {
            return Err("database.statement_timeout_seconds must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: default_driver(),
            host: String::new(),
            port: default_port(),
            database: String::new(),
            username: String::new(),
            password: None,
            max_connections: default_max_connections(),
            connection_timeout_seconds: default_connection_timeout_seconds(),
            statement_timeout_seconds: default_statement_timeout_seconds(),
        }
    }
}

/// Per-type pipeline settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Missing-collection handling; unset means the type's default
    #[serde(default)]
    pub on_list_error: Option<ListErrorPolicy>,

    #[serde(default)]
    pub write_mode: WriteMode,
}

/// Sync selection and per-type policies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Types processed by a run, in order
    #[serde(default = "default_document_types")]
    pub document_types: Vec<DocumentType>,

    #[serde(default)]
    pub invoices: PipelineConfig,

    #[serde(default)]
    pub creditnotes: PipelineConfig,

    #[serde(default)]
    pub bills: PipelineConfig,
}

impl SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.document_types.is_empty() {
            return Err("sync.document_types cannot be empty".to_string());
        }
        for (i, doc_type) in self.document_types.iter().enumerate() {
            if self.document_types[..i].contains(doc_type) {
                return Err(format!(
                    "sync.document_types lists '{doc_type}' more than once"
                ));
            }
        }
        Ok(())
    }

    fn pipeline(&self, document_type: DocumentType) -> &PipelineConfig {
        match document_type {
            DocumentType::Invoice => &self.invoices,
            DocumentType::CreditNote => &self.creditnotes,
            DocumentType::Bill => &self.bills,
        }
    }

    /// Effective list-shape policy for a type
    ///
    /// Bills abort by default; invoices and credit notes truncate.
    pub fn list_error_policy(&self, document_type: DocumentType) -> ListErrorPolicy {
        self.pipeline(document_type)
            .on_list_error
            .unwrap_or(match document_type {
                DocumentType::Bill => ListErrorPolicy::Abort,
                DocumentType::Invoice | DocumentType::CreditNote => ListErrorPolicy::Truncate,
            })
    }

    /// Effective write mode for a type
    pub fn write_mode(&self, document_type: DocumentType) -> WriteMode {
        self.pipeline(document_type).write_mode
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            document_types: default_document_types(),
            invoices: PipelineConfig::default(),
            creditnotes: PipelineConfig::default(),
            bills: PipelineConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Also write JSON logs to rolling files
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation strategy (daily, hourly, never)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled = true".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_accounts_url() -> String {
    "https://accounts.zoho.in/oauth/v2/token".to_string()
}

fn default_api_domain() -> String {
    "https://www.zohoapis.in".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_per_page() -> u32 {
    200
}

fn default_rate_limit_delay_ms() -> u64 {
    200
}

fn default_driver() -> String {
    "postgresql".to_string()
}

fn default_port() -> u16 {
    5432
}

fn default_max_connections() -> usize {
    4
}

fn default_connection_timeout_seconds() -> u64 {
    30
}

fn default_statement_timeout_seconds() -> u64 {
    60
}

fn default_document_types() -> Vec<DocumentType> {
    DocumentType::ALL.to_vec()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret::secret_string;

    fn complete_config() -> BooksEtlConfig {
        let mut config = BooksEtlConfig::default();
        config.books.refresh_token = Some(secret_string("1000.refresh".to_string()));
        config.books.client_id = "1000.CLIENT".to_string();
        config.books.client_secret = Some(secret_string("shh".to_string()));
        config.books.redirect_uri = "https://example.com/callback".to_string();
        config.books.organization_id = "60012345678".to_string();
        config.database.host = "localhost".to_string();
        config.database.database = "books".to_string();
        config.database.username = "etl".to_string();
        config.database.password = Some(secret_string("pg".to_string()));
        config
    }

    #[test]
    fn test_complete_config_is_valid() {
        assert!(complete_config().validate().is_ok());
    }

    #[test]
    fn test_missing_settings_reported_together() {
        let err = BooksEtlConfig::default().validate().unwrap_err();
        assert!(err.contains("ZOHO_REFRESH_TOKEN"));
        assert!(err.contains("ZOHO_CLIENT_ID"));
        assert!(err.contains("ZOHO_CLIENT_SECRET"));
        assert!(err.contains("ZOHO_REDIRECT_URI"));
        assert!(err.contains("ZOHO_ORGANIZATION_ID"));
        assert!(err.contains("SQL_SERVER"));
        assert!(err.contains("SQL_DATABASE"));
        assert!(err.contains("SQL_USERNAME"));
        assert!(err.contains("SQL_PASSWORD"));
    }

    #[test]
    fn test_blank_secret_counts_as_missing() {
        let mut config = complete_config();
        config.database.password = Some(secret_string("  ".to_string()));
        let err = config.validate().unwrap_err();
        assert!(err.contains("SQL_PASSWORD"));
        assert!(!err.contains("SQL_SERVER"));
    }

    #[test]
    fn test_application_config_validation() {
        let mut config = complete_config();
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unsupported_driver_rejected() {
        let mut config = complete_config();
        config.database.driver = "ODBC Driver 18 for SQL Server".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Unsupported database.driver"));
    }

    #[test]
    fn test_per_page_bounds() {
        let mut config = complete_config();
        config.books.per_page = 0;
        assert!(config.validate().is_err());
        config.books.per_page = 201;
        assert!(config.validate().is_err());
        config.books.per_page = 200;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_non_numeric_organization_rejected() {
        let mut config = complete_config();
        config.books.organization_id = "acme".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_list_error_policy_defaults() {
        let sync = SyncConfig::default();
        assert_eq!(
            sync.list_error_policy(DocumentType::Bill),
            ListErrorPolicy::Abort
        );
        assert_eq!(
            sync.list_error_policy(DocumentType::Invoice),
            ListErrorPolicy::Truncate
        );
        assert_eq!(
            sync.list_error_policy(DocumentType::CreditNote),
            ListErrorPolicy::Truncate
        );
        assert_eq!(sync.write_mode(DocumentType::Invoice), WriteMode::Merge);
    }

    #[test]
    fn test_pipeline_overrides_from_toml() {
        let sync: SyncConfig = toml::from_str(
            r#"
document_types = ["invoices", "bills"]

[invoices]
on_list_error = "abort"
write_mode = "append"

[bills]
write_mode = "append"
"#,
        )
        .unwrap();

        assert_eq!(
            sync.document_types,
            vec![DocumentType::Invoice, DocumentType::Bill]
        );
        assert_eq!(
            sync.list_error_policy(DocumentType::Invoice),
            ListErrorPolicy::Abort
        );
        assert_eq!(sync.write_mode(DocumentType::Invoice), WriteMode::Append);
        assert_eq!(
            sync.list_error_policy(DocumentType::Bill),
            ListErrorPolicy::Abort
        );
        assert_eq!(sync.write_mode(DocumentType::CreditNote), WriteMode::Merge);
    }

    #[test]
    fn test_duplicate_document_types_rejected() {
        let mut config = complete_config();
        config.sync.document_types = vec![DocumentType::Bill, DocumentType::Bill];
        assert!(config.validate().is_err());
        config.sync.document_types = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_logging_rotation_validation() {
        let mut config = complete_config();
        config.logging.local_rotation = "size".to_string();
        assert!(config.validate().is_err());
    }
}
