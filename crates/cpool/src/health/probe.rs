//! Bounded liveness probe

use std::time::Duration;

use cpool_core::Connection;
use thiserror::Error;
use tokio::time::Instant;

/// Result of a probe: the round-trip time on success
pub type ProbeResult = Result<Duration, ProbeError>;

/// Error that can occur during a liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The handle was already closed
    #[error("Connection is closed")]
    ConnectionClosed,
    /// The driver reported a failure
    #[error("Liveness probe failed: {0}")]
    Failed(String),
    /// The probe did not complete within its bound
    #[error("Liveness probe timed out after {0:?}")]
    Timeout(Duration),
}

/// Probe a connection and return the round-trip time.
///
/// The probe is bounded by `timeout` so a stuck handle cannot hold up a
/// maintenance pass indefinitely.
pub async fn probe_connection<C: Connection + ?Sized>(conn: &C, timeout: Duration) -> ProbeResult {
    if conn.is_closed() {
        return Err(ProbeError::ConnectionClosed);
    }

    let start = Instant::now();
    match tokio::time::timeout(timeout, conn.ping()).await {
        Ok(Ok(())) => Ok(start.elapsed()),
        Ok(Err(e)) => Err(ProbeError::Failed(e.to_string())),
        Err(_) => Err(ProbeError::Timeout(timeout)),
    }
}
