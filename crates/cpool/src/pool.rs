//! Keyed connection pooling
//!
//! The pool keeps an unordered set of entries, each binding a key (a
//! database name) to a shared connection handle and a last-used instant.
//! Every acquisition reuses the least recently used entry for its key,
//! grows the key's capacity by one while under the per-key limit, and then
//! runs maintenance: TTL expiry, shrinking to the global size cap, and a
//! liveness probe of the survivors.
//!
//! # Example
//!
//! ```ignore
//! use cpool::pool::{ConnectionPool, PoolConfig};
//!
//! let config = PoolConfig::new(100, 5, 300)?;
//! let pool = ConnectionPool::new(config, factory);
//!
//! let conn = pool.acquire("inventory").await?;
//! // Use connection; the pool keeps ownership of its lifetime
//!
//! pool.shutdown().await;
//! ```

mod config;
mod entry;
mod pool;
mod stats;


pub use config::PoolConfig;
pub use pool::ConnectionPool;
pub use stats::PoolStats;
