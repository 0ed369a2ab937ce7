//! Pool configuration types

use std::time::Duration;

use cpool_core::{CpoolError, Result};
use serde::{Deserialize, Serialize};

const DEFAULT_MAX_SIZE: usize = 100;
const DEFAULT_MAX_PER_KEY: usize = 5;
const DEFAULT_TTL_SECS: u64 = 300;
const DEFAULT_PROBE_TIMEOUT_MS: u64 = 5_000;

/// Configuration for a connection pool
///
/// Controls the global size cap, the per-key limit, entry time-to-live and
/// the bound on each liveness probe. Deserialization runs the same
/// validation as [`PoolConfig::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawPoolConfig")]
pub struct PoolConfig {
    /// Maximum number of entries across all keys
    max_size: usize,
    /// Maximum number of entries sharing one key
    max_per_key: usize,
    /// Seconds an entry may go unused before it expires
    ttl_secs: u64,
    /// Timeout in milliseconds for a single liveness probe
    probe_timeout_ms: u64,
}

impl PoolConfig {
    /// Create a new pool configuration
    ///
    /// Returns a configuration error if any of the values is zero.
    pub fn new(max_size: usize, max_per_key: usize, ttl_secs: u64) -> Result<Self> {
        if max_size == 0 {
            return Err(CpoolError::Configuration(
                "max_size must be greater than 0".into(),
            ));
        }
        if max_per_key == 0 {
            return Err(CpoolError::Configuration(
                "max_per_key must be greater than 0".into(),
            ));
        }
        if ttl_secs == 0 {
            return Err(CpoolError::Configuration(
                "ttl must be at least 1 second".into(),
            ));
        }

        Ok(Self {
            max_size,
            max_per_key,
            ttl_secs,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        })
    }

    /// Set the liveness probe timeout in milliseconds
    ///
    /// A zero timeout is raised to 1ms.
    pub fn with_probe_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.probe_timeout_ms = timeout_ms.max(1);
        self
    }

    /// Get the global size cap
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the per-key limit
    pub fn max_per_key(&self) -> usize {
        self.max_per_key
    }

    /// Get the entry time-to-live as a Duration
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    /// Get the liveness probe timeout as a Duration
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }
}

impl Default for PoolConfig {
    /// Create a default pool configuration
    ///
    /// Defaults:
    /// - max_size: 100
    /// - max_per_key: 5
    /// - ttl: 5 minutes
    /// - probe_timeout: 5 seconds
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            max_per_key: DEFAULT_MAX_PER_KEY,
            ttl_secs: DEFAULT_TTL_SECS,
            probe_timeout_ms: DEFAULT_PROBE_TIMEOUT_MS,
        }
    }
}

#[derive(Deserialize)]
struct RawPoolConfig {
    max_size: usize,
    max_per_key: usize,
    ttl_secs: u64,
    #[serde(default = "default_probe_timeout_ms")]
    probe_timeout_ms: u64,
}

fn default_probe_timeout_ms() -> u64 {
    DEFAULT_PROBE_TIMEOUT_MS
}

impl TryFrom<RawPoolConfig> for PoolConfig {
    type Error = CpoolError;

    fn try_from(raw: RawPoolConfig) -> Result<Self> {
        Ok(PoolConfig::new(raw.max_size, raw.max_per_key, raw.ttl_secs)?
            .with_probe_timeout_ms(raw.probe_timeout_ms))
    }
}
