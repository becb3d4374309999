//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::BooksEtlConfig;
use super::secret::secret_string;
use crate::domain::errors::EtlError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads and validates the configuration
///
/// 1. Reads the TOML file when a path is given, otherwise starts from defaults
/// 2. Substitutes `${VAR}` placeholders from the environment
/// 3. Applies the environment overrides (`SQL_*`, `ZOHO_*`, `BOOKS_ETL_*`)
/// 4. Validates the result
///
/// # Errors
///
/// Returns [`EtlError::Configuration`] if the file cannot be read or parsed, a
/// placeholder refers to an unset variable, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use books_etl::config::load_config;
/// use std::path::Path;
///
/// let config = load_config(Some(Path::new("books-etl.toml"))).expect("config");
/// println!("{}", config.books.organization_id);
/// ```
pub fn load_config(path: Option<&Path>) -> Result<BooksEtlConfig> {
    let mut config = match path {
        Some(path) => read_config_file(path)?,
        None => BooksEtlConfig::default(),
    };

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        EtlError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

fn read_config_file(path: &Path) -> Result<BooksEtlConfig> {
    if !path.exists() {
        return Err(EtlError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        EtlError::Configuration(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;
    let config: BooksEtlConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Replaces `${VAR_NAME}` placeholders outside comment lines
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| EtlError::Other(format!("Invalid placeholder pattern: {e}")))?;
    let mut missing_vars: Vec<String> = Vec::new();

    let lines: Vec<String> = input
        .lines()
        .map(|line| {
            if line.trim_start().starts_with('#') {
                return line.to_string();
            }
            re.replace_all(line, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                match std::env::var(var_name) {
                    Ok(value) => value,
                    Err(_) => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        caps[0].to_string()
                    }
                }
            })
            .into_owned()
        })
        .collect();

    if !missing_vars.is_empty() {
        return Err(EtlError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(lines.join("\n"))
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| {
        EtlError::Configuration(format!("Invalid value for {name} '{value}': {e}"))
    })
}

/// Applies environment overrides
///
/// Uses the variable names the job has always been deployed with, plus
/// `SQL_PORT`, `BOOKS_ETL_LOG_LEVEL` and `BOOKS_ETL_DRY_RUN`. Empty variables
/// are treated as unset.
fn apply_env_overrides(config: &mut BooksEtlConfig) -> Result<()> {
    // Application overrides
    if let Some(val) = env_value("BOOKS_ETL_LOG_LEVEL") {
        config.application.log_level = val.to_lowercase();
    }
    if let Some(val) = env_value("BOOKS_ETL_DRY_RUN") {
        config.application.dry_run = parse_env("BOOKS_ETL_DRY_RUN", &val)?;
    }

    // Database overrides
    if let Some(val) = env_value("SQL_DRIVER") {
        config.database.driver = val;
    }
    if let Some(val) = env_value("SQL_SERVER") {
        config.database.host = val;
    }
    if let Some(val) = env_value("SQL_PORT") {
        config.database.port = parse_env("SQL_PORT", &val)?;
    }
    if let Some(val) = env_value("SQL_DATABASE") {
        config.database.database = val;
    }
    if let Some(val) = env_value("SQL_USERNAME") {
        config.database.username = val;
    }
    if let Some(val) = env_value("SQL_PASSWORD") {
        config.database.password = Some(secret_string(val));
    }

    // Accounting API overrides
    if let Some(val) = env_value("ZOHO_REFRESH_TOKEN") {
        config.books.refresh_token = Some(secret_string(val));
    }
    if let Some(val) = env_value("ZOHO_CLIENT_ID") {
        config.books.client_id = val;
    }
    if let Some(val) = env_value("ZOHO_CLIENT_SECRET") {
        config.books.client_secret = Some(secret_string(val));
    }
    if let Some(val) = env_value("ZOHO_REDIRECT_URI") {
        config.books.redirect_uri = val;
    }
    if let Some(val) = env_value("ZOHO_ORGANIZATION_ID") {
        config.books.organization_id = val;
    }
    if let Some(val) = env_value("ZOHO_BILLS_STATUS_FILTER") {
        config.books.bills_status_filter = Some(parse_env("ZOHO_BILLS_STATUS_FILTER", &val)?);
    }

    Ok(())
}
