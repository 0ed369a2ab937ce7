//! MySQL connection handle

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use cpool_core::{Connection, CpoolError, Result};
use mysql_async::{Conn, Opts, OptsBuilder, Pool, PoolConstraints, PoolOpts};
use mysql_async::prelude::Queryable;

use crate::settings::MySqlSettings;
use crate::tls::skip_verify_ssl_opts;

/// A MySQL connection bound to one database
///
/// Wraps a single-socket `mysql_async` pool so the handle can be shared by
/// several callers; each borrows the socket through [`MySqlConnection::get_conn`].
pub struct MySqlConnection {
    pool: Pool,
    database: String,
    closed: AtomicBool,
}

impl MySqlConnection {
    /// Connect to `database` using `settings`
    ///
    /// The socket is opened eagerly so authentication and network failures
    /// surface here rather than on first use.
    pub async fn connect(settings: &MySqlSettings, database: &str) -> Result<Self> {
        tracing::info!(dsn = %settings.redacted_dsn(database), "connecting to MySQL database");

        let constraints = PoolConstraints::new(1, 1).ok_or_else(|| {
            CpoolError::Connection(
                "Failed to configure MySQL pool constraints (min=1, max=1)".into(),
            )
        })?;
        let pool_opts = PoolOpts::default()
            .with_constraints(constraints)
            .with_reset_connection(false);

        let opts: Opts = OptsBuilder::default()
            .ip_or_hostname(settings.host.as_str())
            .tcp_port(settings.port)
            .user(Some(settings.username.as_str()))
            .pass(Some(settings.password.as_str()))
            .db_name(Some(database))
            .ssl_opts(skip_verify_ssl_opts())
            .pool_opts(pool_opts)
            .into();

        let pool = Pool::new(opts);
        if let Err(e) = pool.get_conn().await {
            if let Err(cleanup) = pool.disconnect().await {
                tracing::warn!(
                    database,
                    error = %cleanup,
                    "failed to tear down MySQL pool after connect error"
                );
            }
            return Err(CpoolError::Connection(format!(
                "Failed to connect to MySQL database {}: {}",
                database, e
            )));
        }

        tracing::info!(host = %settings.host, port = settings.port, database, "MySQL connection established");
        Ok(Self {
            pool,
            database: database.to_string(),
            closed: AtomicBool::new(false),
        })
    }

    /// Borrow the underlying socket for query execution
    pub async fn get_conn(&self) -> Result<Conn> {
        if self.is_closed() {
            return Err(CpoolError::Connection(format!(
                "MySQL connection to {} is closed",
                self.database
            )));
        }
        self.pool
            .get_conn()
            .await
            .map_err(|e| CpoolError::Connection(format!("Failed to get MySQL connection: {}", e)))
    }

    /// Name of the database this handle is bound to
    pub fn database(&self) -> &str {
        &self.database
    }
}

#[async_trait]
impl Connection for MySqlConnection {
    fn driver_name(&self) -> &str {
        "mysql"
    }

    async fn ping(&self) -> Result<()> {
        let mut conn = self.get_conn().await?;
        conn.ping()
            .await
            .map_err(|e| CpoolError::Connection(format!("MySQL ping failed: {}", e)))
    }

    async fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        tracing::info!(database = %self.database, "closing MySQL connection");
        self.pool
            .clone()
            .disconnect()
            .await
            .map_err(|e| CpoolError::Connection(format!("Failed to close MySQL connection: {}", e)))
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
