//! Tests for the health module

use super::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use cpool_core::{Connection, CpoolError, Result};

enum PingBehavior {
    Ok,
    Fail,
    Hang,
}

struct ProbeTarget {
    behavior: PingBehavior,
    closed: AtomicBool,
}

impl ProbeTarget {
    fn new(behavior: PingBehavior) -> Self {
        Self {
            behavior,
            closed: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl Connection for ProbeTarget {
    fn driver_name(&self) -> &str {
        "probe-target"
    }

    async fn ping(&self) -> Result<()> {
        match self.behavior {
            PingBehavior::Ok => Ok(()),
            PingBehavior::Fail => Err(CpoolError::Connection("broken pipe".into())),
            PingBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

#[tokio::test]
async fn test_probe_success_reports_latency() {
    let target = ProbeTarget::new(PingBehavior::Ok);
    let latency = probe_connection(&target, Duration::from_secs(1))
        .await
        .expect("probe");
    assert!(latency < Duration::from_secs(1));
}

#[tokio::test]
async fn test_probe_driver_failure() {
    let target = ProbeTarget::new(PingBehavior::Fail);
    let err = probe_connection(&target, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ProbeError::Failed("Connection error: broken pipe".to_string())
    );
}

#[tokio::test(start_paused = true)]
async fn test_probe_times_out() {
    let target = ProbeTarget::new(PingBehavior::Hang);
    let err = probe_connection(&target, Duration::from_millis(200))
        .await
        .unwrap_err();
    assert_eq!(err, ProbeError::Timeout(Duration::from_millis(200)));
    assert!(err.to_string().contains("timed out"));
}

#[tokio::test]
async fn test_probe_closed_connection() {
    let target = ProbeTarget::new(PingBehavior::Ok);
    target.close().await.expect("close");

    let err = probe_connection(&target, Duration::from_secs(1))
        .await
        .unwrap_err();
    assert_eq!(err, ProbeError::ConnectionClosed);
}

#[tokio::test]
async fn test_probe_through_trait_object() {
    let target: Box<dyn Connection> = Box::new(ProbeTarget::new(PingBehavior::Ok));
    assert!(probe_connection(&*target, Duration::from_secs(1)).await.is_ok());
}
