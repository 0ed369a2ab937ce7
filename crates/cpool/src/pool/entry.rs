//! Pool entry bookkeeping

use std::sync::Arc;
use std::time::Duration;

use cpool_core::Connection;
use tokio::time::Instant;
use uuid::Uuid;

/// One pooled handle bound to a key
pub(super) struct PoolEntry<C> {
    id: Uuid,
    key: String,
    connection: Arc<C>,
    created_at: Instant,
    last_used: Instant,
}

impl<C: Connection> PoolEntry<C> {
    pub(super) fn new(key: &str, connection: C) -> Self {
        let now = Instant::now();
        Self {
            id: Uuid::new_v4(),
            key: key.to_string(),
            connection: Arc::new(connection),
            created_at: now,
            last_used: now,
        }
    }

    pub(super) fn id(&self) -> Uuid {
        self.id
    }

    pub(super) fn key(&self) -> &str {
        &self.key
    }

    pub(super) fn handle(&self) -> Arc<C> {
        Arc::clone(&self.connection)
    }

    pub(super) fn last_used(&self) -> Instant {
        self.last_used
    }

    /// Mark the entry as used at `now`; never moves the timestamp backwards.
    pub(super) fn touch(&mut self, now: Instant) {
        self.last_used = self.last_used.max(now);
    }

    pub(super) fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.last_used) > ttl
    }

    /// Close the underlying handle, consuming the entry.
    pub(super) async fn close(self, reason: &'static str) {
        let age = self.created_at.elapsed();
        if let Err(e) = self.connection.close().await {
            tracing::warn!(
                entry_id = %self.id,
                key = %self.key,
                reason,
                error = %e,
                "failed to close pooled connection"
            );
            return;
        }
        tracing::debug!(
            entry_id = %self.id,
            key = %self.key,
            reason,
            age_ms = age.as_millis() as u64,
            "closed pooled connection"
        );
    }
}
