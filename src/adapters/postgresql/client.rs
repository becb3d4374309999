//! PostgreSQL connection pool

use crate::config::schema::DatabaseConfig;
use crate::domain::{EtlError, Result};
use deadpool_postgres::{Manager, ManagerConfig, Object, Pool, RecyclingMethod, Runtime};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio_postgres::NoTls;

/// Pooled PostgreSQL client
pub struct PostgresClient {
    pool: Pool,
    config: DatabaseConfig,
}

impl PostgresClient {
    /// Create the pool; no connection is opened until first use
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be built.
    pub fn new(config: DatabaseConfig) -> Result<Self> {
        let mut pg_config = tokio_postgres::Config::new();
        pg_config
            .host(&config.host)
            .port(config.port)
            .dbname(&config.database)
            .user(&config.username)
            .application_name("books-etl")
            .connect_timeout(Duration::from_secs(config.connection_timeout_seconds));
        if let Some(password) = &config.password {
            pg_config.password(password.expose_secret().as_str());
        }

        let manager = Manager::from_config(
            pg_config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );

        let timeout = Some(Duration::from_secs(config.connection_timeout_seconds));
        let pool = Pool::builder(manager)
            .max_size(config.max_connections)
            .runtime(Runtime::Tokio1)
            .wait_timeout(timeout)
            .create_timeout(timeout)
            .recycle_timeout(timeout)
            .build()
            .map_err(|e| EtlError::Database(format!("Failed to create connection pool: {e}")))?;

        Ok(Self { pool, config })
    }

    /// Get a connection from the pool
    ///
    /// # Errors
    ///
    /// Returns an error if a connection cannot be obtained.
    pub async fn get_connection(&self) -> Result<Object> {
        self.pool
            .get()
            .await
            .map_err(|e| EtlError::Database(format!("Failed to get connection from pool: {e}")))
    }

    /// Run `SELECT 1`
    pub async fn test_connection(&self) -> Result<()> {
        let client = self.get_connection().await?;
        client
            .query_one("SELECT 1", &[])
            .await
            .map_err(|e| EtlError::Database(format!("Connection test failed: {e}")))?;

        tracing::info!(
            host = %self.config.host,
            database = %self.config.database,
            "PostgreSQL connection test successful"
        );
        Ok(())
    }

    /// Apply the idempotent schema script
    pub async fn ensure_schema(&self) -> Result<()> {
        let client = self.get_connection().await?;
        let migration_sql = include_str!("../../../migrations/001_initial_schema.sql");

        client
            .batch_execute(migration_sql)
            .await
            .map_err(|e| EtlError::Database(format!("Failed to execute migration: {e}")))?;

        tracing::info!("PostgreSQL schema initialized successfully");
        Ok(())
    }

    /// `SET LOCAL` statement for the configured per-transaction timeout
    pub fn statement_timeout_sql(&self) -> String {
        format!(
            "SET LOCAL statement_timeout = {}",
            self.config.statement_timeout_seconds * 1000
        )
    }

    /// Close the pool; idle connections are dropped
    pub fn close(&self) {
        self.pool.close();
        tracing::debug!("PostgreSQL pool closed");
    }
}
