//! The polling-loop discipline shared by both consumers.
//!
//! One perpetual loop per consumer: run a full cycle, log and swallow any
//! error, sleep the configured interval, repeat. Cycles never overlap
//! themselves, and there is no signalling between consumers — coordination
//! happens only through the durable artifacts one writes and the other
//! reads.

use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::Result;

/// One pollable unit of pipeline work.
#[async_trait]
pub trait Cycle: Send {
    /// Stable name used in log events.
    fn name(&self) -> &'static str;

    async fn run_cycle(&mut self) -> Result<()>;
}

/// Drive a consumer until `shutdown` is cancelled.
///
/// Errors never escape: a failed cycle is logged and the loop carries on at
/// the next interval. Cancellation is observed at the sleep boundary, so an
/// in-flight cycle always completes (or fails) before the loop exits.
pub async fn run(mut cycle: impl Cycle, interval: Duration, shutdown: CancellationToken) {
    info!(
        consumer = cycle.name(),
        interval_secs = interval.as_secs(),
        "consumer loop started"
    );
    loop {
        if let Err(err) = cycle.run_cycle().await {
            error!(consumer = cycle.name(), %err, "cycle failed, retrying next interval");
        }
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    info!(consumer = cycle.name(), "consumer loop stopped");
}
