//! MySQL connection factory

use async_trait::async_trait;
use cpool_core::{ConnectionFactory, Result};

use crate::MySqlConnection;
use crate::settings::{MySqlSettings, validate_database_name};

/// Opens MySQL connections keyed by database name
///
/// Every connection shares the factory's host, port and credentials; the
/// pool key selects the database.
#[derive(Debug, Clone)]
pub struct MySqlConnectionFactory {
    settings: MySqlSettings,
}

impl MySqlConnectionFactory {
    /// Create a factory from explicit settings
    pub fn new(settings: MySqlSettings) -> Self {
        tracing::debug!(host = %settings.host, port = settings.port, "MySQL connection factory initialized");
        Self { settings }
    }

    /// Create a factory from the `MYSQL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(MySqlSettings::from_env()?))
    }

    /// Get the settings shared by every connection
    pub fn settings(&self) -> &MySqlSettings {
        &self.settings
    }
}

#[async_trait]
impl ConnectionFactory for MySqlConnectionFactory {
    type Connection = MySqlConnection;

    #[tracing::instrument(skip(self), fields(host = %self.settings.host, port = self.settings.port))]
    async fn create(&self, key: &str) -> Result<MySqlConnection> {
        validate_database_name(key)?;
        MySqlConnection::connect(&self.settings, key)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "failed to connect to MySQL database"))
    }
}
