//! Connection and factory traits

use async_trait::async_trait;
use std::sync::Arc;

use crate::Result;

/// A poolable database connection handle
///
/// The pool treats a handle as opaque: it only needs to probe it and close
/// it. Query execution is left to the concrete driver type, which callers
/// reach through the `Arc` the pool hands out.
#[async_trait]
pub trait Connection: Send + Sync + 'static {
    /// Get the driver name (e.g., "mysql")
    fn driver_name(&self) -> &str;

    /// Lightweight liveness check against the underlying resource
    async fn ping(&self) -> Result<()>;

    /// Close the connection
    async fn close(&self) -> Result<()>;

    /// Check if the connection is closed
    fn is_closed(&self) -> bool;
}

/// Factory trait for establishing connections bound to a key
///
/// The key is the logical resource name (for SQL drivers, the database
/// name). Host, port and credentials belong to the factory.
#[async_trait]
pub trait ConnectionFactory: Send + Sync + 'static {
    /// Connection type produced by this factory
    type Connection: Connection;

    /// Create a new connection bound to `key`
    async fn create(&self, key: &str) -> Result<Self::Connection>;
}

#[async_trait]
impl<T: ConnectionFactory> ConnectionFactory for Arc<T> {
    type Connection = T::Connection;

    async fn create(&self, key: &str) -> Result<Self::Connection> {
        (**self).create(key).await
    }
}
