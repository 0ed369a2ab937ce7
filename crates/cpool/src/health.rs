//! Liveness probing for pooled connections
//!
//! The pool probes every surviving handle at the end of each maintenance
//! pass. A failed probe is reported but never evicts the handle; the next
//! caller to use it observes the failure through the driver.
//!
//! # Example
//!
//! ```ignore
//! use cpool::health::probe_connection;
//! use std::time::Duration;
//!
//! let latency = probe_connection(&*conn, Duration::from_secs(5)).await?;
//! println!("Round trip: {:?}", latency);
//! ```

mod probe;

#[cfg(test)]
mod tests;

pub use probe::{ProbeError, ProbeResult, probe_connection};
