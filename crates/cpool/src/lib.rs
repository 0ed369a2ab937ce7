//! cpool - Keyed connection pooling
//!
//! This crate caches reusable connections per logical database name, with
//! time-based expiry, a per-key fan-out limit and a global size cap.

pub mod health;
pub mod pool;

pub use cpool_core::{Connection, ConnectionFactory, CpoolError, Result};
pub use health::{ProbeError, ProbeResult, probe_connection};
pub use pool::{ConnectionPool, PoolConfig, PoolStats};
