//! Connection settings for the MySQL factory
//!
//! Host, port and credentials are shared by every pooled connection; only
//! the database name varies, and it arrives as the pool key.

use std::fmt;

use cpool_core::{CpoolError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_PORT: u16 = 3306;
const MAX_DATABASE_NAME_LEN: usize = 64;

/// Host, port and credentials used to open connections
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MySqlSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default = "default_password")]
    pub password: String,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_username() -> String {
    "user".to_string()
}

fn default_password() -> String {
    "password".to_string()
}

impl Default for MySqlSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            username: default_username(),
            password: default_password(),
        }
    }
}

impl MySqlSettings {
    /// Load settings from `MYSQL_HOST`, `MYSQL_PORT`, `MYSQL_USERNAME` and
    /// `MYSQL_PASSWORD`, falling back to the defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let port = match lookup("MYSQL_PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| {
                CpoolError::Configuration(format!("invalid MYSQL_PORT {:?}: {}", raw, e))
            })?,
            None => defaults.port,
        };

        let settings = Self {
            host: lookup("MYSQL_HOST").unwrap_or(defaults.host),
            port,
            username: lookup("MYSQL_USERNAME").unwrap_or(defaults.username),
            password: lookup("MYSQL_PASSWORD").unwrap_or(defaults.password),
        };
        tracing::debug!(settings = ?settings, "loaded MySQL settings");
        Ok(settings)
    }

    /// Connection string for `database` with the password masked, for logs
    ///
    /// `user:***@tcp(host:port)/database?parseTime=true&tls=skip-verify`
    pub fn redacted_dsn(&self, database: &str) -> String {
        format!(
            "{}:***@tcp({}:{})/{}?parseTime=true&tls=skip-verify",
            self.username, self.host, self.port, database
        )
    }
}

impl fmt::Debug for MySqlSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MySqlSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Check that `name` is usable as a MySQL database name.
///
/// MySQL rejects names longer than 64 characters, names ending in a space,
/// and names containing `/`, `\`, `.` or NUL.
pub fn validate_database_name(name: &str) -> Result<()> {
    let invalid = |reason: &str| {
        Err(CpoolError::Connection(format!(
            "invalid database name {:?}: {}",
            name, reason
        )))
    };

    if name.is_empty() {
        return invalid("name is empty");
    }
    if name.chars().count() > MAX_DATABASE_NAME_LEN {
        return invalid("longer than 64 characters");
    }
    if name.ends_with(' ') {
        return invalid("ends with a space");
    }
    if let Some(c) = name.chars().find(|c| matches!(c, '/' | '\\' | '.' | '\0')) {
        return invalid(&format!("contains {:?}", c));
    }
    Ok(())
}

#[cfg(test)]
mod tests;
