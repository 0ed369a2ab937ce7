//! Connection pool implementation

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use cpool_core::{Connection, ConnectionFactory, CpoolError, Result};
use futures::future::join_all;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use uuid::Uuid;

use super::config::PoolConfig;
use super::entry::PoolEntry;
use super::stats::PoolStats;
use crate::health::probe_connection;

/// Mutable pool state, guarded by a single lock
struct PoolState<C> {
    config: PoolConfig,
    entries: Vec<PoolEntry<C>>,
    closed: bool,
}

impl<C: Connection> PoolState<C> {
    fn count_for(&self, key: &str) -> usize {
        self.entries.iter().filter(|e| e.key() == key).count()
    }
}

/// A bounded cache of shared connections keyed by database name
///
/// Handles are shared, not leased: several callers may hold the same
/// `Arc` at once, and the pool keeps ownership of every handle's lifetime.
/// All state changes, including connection establishment, happen under one
/// lock, so new connections are created one at a time across the pool.
/// Closing removed handles and liveness checks run outside that lock.
pub struct ConnectionPool<F: ConnectionFactory> {
    /// Connection factory
    factory: F,
    /// Entries and tunables
    state: Mutex<PoolState<F::Connection>>,
    /// Failures seen by the most recent liveness pass to finish
    probe_failures: Arc<AtomicUsize>,
}

impl<F: ConnectionFactory> ConnectionPool<F> {
    /// Create a new connection pool with the given configuration and factory
    pub fn new(config: PoolConfig, factory: F) -> Self {
        Self {
            factory,
            state: Mutex::new(PoolState {
                config,
                entries: Vec::new(),
                closed: false,
            }),
            probe_failures: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a connection pool with the default configuration
    pub fn with_defaults(factory: F) -> Self {
        Self::new(PoolConfig::default(), factory)
    }

    /// Replace the pool's size cap, per-key limit and TTL
    ///
    /// Existing entries that violate the new limits are not evicted here;
    /// the next maintenance pass enforces them. The probe timeout is kept.
    pub async fn configure(
        &self,
        max_size: usize,
        max_per_key: usize,
        ttl_secs: u64,
    ) -> Result<()> {
        let mut state = self.state.lock().await;
        let config = PoolConfig::new(max_size, max_per_key, ttl_secs)?
            .with_probe_timeout_ms(state.config.probe_timeout().as_millis() as u64);
        tracing::debug!(max_size, max_per_key, ttl_secs, "reconfiguring pool");
        state.config = config;
        Ok(())
    }

    /// Replace the whole pool configuration
    pub async fn set_config(&self, config: PoolConfig) {
        let mut state = self.state.lock().await;
        tracing::debug!(config = ?config, "replacing pool configuration");
        state.config = config;
    }

    /// Get a copy of the current configuration
    pub async fn config(&self) -> PoolConfig {
        self.state.lock().await.config.clone()
    }

    /// Get a connection for `key`
    ///
    /// This will:
    /// 1. Reuse the least recently used entry for `key`, if any
    /// 2. While under the per-key limit, establish one more entry for
    ///    future callers (a failure there is logged, not returned)
    /// 3. Otherwise establish a fresh entry and return it
    /// 4. Run maintenance before returning
    ///
    /// Liveness checks started by this call run in the background; the
    /// caller does not wait for them. If no entry exists and the factory
    /// fails, the error is returned and the pool is left untouched.
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    pub async fn acquire(&self, key: &str) -> Result<Arc<F::Connection>> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(CpoolError::PoolClosed);
        }

        let existing = state.count_for(key);
        let now = Instant::now();
        let reused = state
            .entries
            .iter_mut()
            .filter(|e| e.key() == key)
            .min_by_key(|e| e.last_used())
            .map(|entry| {
                entry.touch(now);
                (entry.handle(), entry.id())
            });

        let (handle, handle_id) = match reused {
            Some((handle, id)) => {
                tracing::trace!(entry_id = %id, existing, "reusing least recently used connection");
                if existing < state.config.max_per_key() {
                    tracing::debug!(existing, "adding connection for existing key");
                    if let Err(e) = self.push_entry(&mut *state, key).await {
                        tracing::warn!(
                            error = %e,
                            "failed to add spare connection, returning existing one"
                        );
                    }
                }
                (handle, id)
            }
            None => {
                tracing::trace!("no connection for key, creating one");
                self.push_entry(&mut *state, key).await.inspect_err(|e| {
                    tracing::error!(error = %e, "failed to create connection");
                })?
            }
        };

        let mut pass = maintain_locked(&mut *state, Some(handle_id));
        drop(state);

        pass.wait_for_closes().await;
        pass.spawn_probes(Arc::clone(&self.probe_failures));
        Ok(handle)
    }

    /// Run a maintenance pass: expire, shrink to the size cap, probe
    ///
    /// Unlike the pass run by [`acquire`](Self::acquire), this waits for the
    /// liveness checks to finish.
    pub async fn maintain(&self) {
        let mut pass = {
            let mut state = self.state.lock().await;
            if state.closed {
                return;
            }
            maintain_locked(&mut *state, None)
        };

        pass.wait_for_closes().await;
        pass.run_probes(&self.probe_failures).await;
    }

    /// Close every pooled connection and refuse further acquisitions
    ///
    /// Calling this more than once is a no-op.
    pub async fn shutdown(&self) {
        let closing = {
            let mut state = self.state.lock().await;
            if state.closed {
                return;
            }
            state.closed = true;
            let entries = std::mem::take(&mut state.entries);
            tracing::info!(count = entries.len(), "shutting down connection pool");
            close_detached(entries.into_iter().map(|e| (e, "shutdown")).collect())
        };

        await_closes(closing).await;
    }

    /// Whether `shutdown` has been called
    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }

    /// Number of entries currently bound to `key`
    pub async fn count_for(&self, key: &str) -> usize {
        self.state.lock().await.count_for(key)
    }

    /// Get current pool statistics
    pub async fn stats(&self) -> PoolStats {
        let state = self.state.lock().await;
        let distinct_keys = state
            .entries
            .iter()
            .map(|e| e.key())
            .collect::<HashSet<_>>()
            .len();
        PoolStats::new(
            state.entries.len(),
            distinct_keys,
            state.config.max_size(),
            state.config.max_per_key(),
            self.probe_failures.load(Ordering::SeqCst),
        )
    }

    /// Establish a connection for `key` and append it to the pool
    async fn push_entry(
        &self,
        state: &mut PoolState<F::Connection>,
        key: &str,
    ) -> Result<(Arc<F::Connection>, Uuid)> {
        let connection = self.factory.create(key).await?;
        let entry = PoolEntry::new(key, connection);
        let created = (entry.handle(), entry.id());
        tracing::debug!(
            entry_id = %entry.id(),
            total = state.entries.len() + 1,
            "pooled new connection"
        );
        state.entries.push(entry);
        Ok(created)
    }
}

/// A handle picked for a liveness check
struct ProbeTarget<C> {
    id: Uuid,
    key: String,
    connection: Arc<C>,
}

/// Work left over from a maintenance pass once the pool lock is released
struct PendingPass<C> {
    closing: Option<JoinHandle<()>>,
    targets: Vec<ProbeTarget<C>>,
    timeout: Duration,
}

impl<C: Connection> PendingPass<C> {
    async fn wait_for_closes(&mut self) {
        if let Some(closing) = self.closing.take() {
            await_closes(closing).await;
        }
    }

    /// Check every target and publish the failure count
    async fn run_probes(self, failures: &AtomicUsize) {
        let count = probe_all(self.targets, self.timeout).await;
        failures.store(count, Ordering::SeqCst);
    }

    fn spawn_probes(self, failures: Arc<AtomicUsize>) {
        if self.targets.is_empty() {
            return;
        }
        tokio::spawn(async move { self.run_probes(&failures).await });
    }
}

/// Expire, shrink and pick probe targets, in that order
///
/// Removed entries are closed on a spawned task, so they are closed even if
/// the caller stops waiting. `keep` names an entry the resize pass must not
/// evict: the one the current acquisition is about to hand out.
fn maintain_locked<C: Connection>(state: &mut PoolState<C>, keep: Option<Uuid>) -> PendingPass<C> {
    let now = Instant::now();
    let ttl = state.config.ttl();
    let mut doomed = Vec::new();

    let (expired, live): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entries)
        .into_iter()
        .partition(|e| e.is_expired(now, ttl));
    state.entries = live;
    for entry in expired {
        tracing::trace!(entry_id = %entry.id(), key = %entry.key(), "removing expired connection");
        doomed.push((entry, "expired"));
    }

    let max_size = state.config.max_size();
    if state.entries.len() > max_size {
        let excess = state.entries.len() - max_size;
        tracing::trace!(excess, max_size, "reducing pool size to max");

        // Stable sort: equal timestamps fall back to insertion order.
        let mut candidates: Vec<usize> = (0..state.entries.len())
            .filter(|&i| Some(state.entries[i].id()) != keep)
            .collect();
        candidates.sort_by_key(|&i| state.entries[i].last_used());
        let evict: HashSet<usize> = candidates.into_iter().take(excess).collect();

        let (evicted, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut state.entries)
            .into_iter()
            .enumerate()
            .partition(|(i, _)| evict.contains(i));
        state.entries = kept.into_iter().map(|(_, e)| e).collect();
        doomed.extend(evicted.into_iter().map(|(_, e)| (e, "resized")));
    }

    let targets = state
        .entries
        .iter()
        .map(|entry| ProbeTarget {
            id: entry.id(),
            key: entry.key().to_string(),
            connection: entry.handle(),
        })
        .collect();

    PendingPass {
        closing: (!doomed.is_empty()).then(|| close_detached(doomed)),
        targets,
        timeout: state.config.probe_timeout(),
    }
}

/// Close removed entries on their own task
fn close_detached<C: Connection>(doomed: Vec<(PoolEntry<C>, &'static str)>) -> JoinHandle<()> {
    tokio::spawn(async move {
        for (entry, reason) in doomed {
            entry.close(reason).await;
        }
    })
}

async fn await_closes(closing: JoinHandle<()>) {
    if let Err(e) = closing.await {
        tracing::warn!(error = %e, "connection close task failed");
    }
}

/// Probe every target concurrently and return how many failed
async fn probe_all<C: Connection>(targets: Vec<ProbeTarget<C>>, timeout: Duration) -> usize {
    let probes = targets.iter().map(|target| async move {
        let outcome = probe_connection(target.connection.as_ref(), timeout).await;
        if let Err(e) = &outcome {
            tracing::debug!(
                entry_id = %target.id,
                key = %target.key,
                error = %e,
                "liveness probe failed"
            );
        }
        outcome.is_err()
    });
    join_all(probes).await.into_iter().filter(|failed| *failed).count()
}
