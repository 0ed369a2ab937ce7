//! Pool statistics types

use serde::{Deserialize, Serialize};

/// Statistics about a connection pool's current state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Total number of entries across all keys
    total: usize,
    /// Number of distinct keys with at least one entry
    distinct_keys: usize,
    /// Configured global size cap
    max_size: usize,
    /// Configured per-key limit
    max_per_key: usize,
    /// Probe failures observed by the most recent maintenance pass
    last_probe_failures: usize,
}

impl PoolStats {
    /// Create new pool statistics
    pub fn new(
        total: usize,
        distinct_keys: usize,
        max_size: usize,
        max_per_key: usize,
        last_probe_failures: usize,
    ) -> Self {
        Self {
            total,
            distinct_keys,
            max_size,
            max_per_key,
            last_probe_failures,
        }
    }

    /// Get the total number of entries
    pub fn total(&self) -> usize {
        self.total
    }

    /// Get the number of distinct keys
    pub fn distinct_keys(&self) -> usize {
        self.distinct_keys
    }

    /// Get the configured global size cap
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Get the configured per-key limit
    pub fn max_per_key(&self) -> usize {
        self.max_per_key
    }

    /// Get the number of probe failures seen by the last maintenance pass
    pub fn last_probe_failures(&self) -> usize {
        self.last_probe_failures
    }

    /// Calculate pool utilization as a fraction of the size cap (0.0 to 1.0)
    ///
    /// May briefly exceed 1.0 after the cap is lowered, until the next
    /// maintenance pass shrinks the pool.
    pub fn utilization(&self) -> f64 {
        if self.max_size == 0 {
            0.0
        } else {
            self.total as f64 / self.max_size as f64
        }
    }

    /// Check if the pool has reached its size cap
    pub fn is_full(&self) -> bool {
        self.max_size > 0 && self.total >= self.max_size
    }
}

impl Default for PoolStats {
    fn default() -> Self {
        Self::new(0, 0, 0, 0, 0)
    }
}
