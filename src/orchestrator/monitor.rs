//! Periodic process resource sampling.
//!
//! Only worth running when an accelerator is present, since the point is to
//! watch inference memory creep; on CPU-only hosts the monitor is skipped
//! entirely rather than logging noise every interval.

use std::path::Path;
use std::time::Duration;

use sysinfo::System;
use tokio::sync::watch;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{info, warn};

use crate::error::Result;

const NVIDIA_PROC_PATH: &str = "/proc/driver/nvidia/version";
const FORCE_MONITOR_ENV: &str = "VOSTREAM_FORCE_MONITOR";

/// Whether this host has a usable accelerator (or the monitor is forced on
/// for testing via `VOSTREAM_FORCE_MONITOR=1`).
pub fn accelerator_present() -> bool {
    Path::new(NVIDIA_PROC_PATH).exists()
        || std::env::var(FORCE_MONITOR_ENV).is_ok_and(|v| v == "1")
}

pub struct ResourceMonitor {
    interval: Duration,
}

impl ResourceMonitor {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Sample this process's CPU and memory every interval until shutdown.
    /// Sampling failures are logged and skipped; the monitor never takes
    /// the orchestrator down.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => pid,
            Err(err) => {
                warn!(error = %err, "cannot resolve own pid, resource monitor disabled");
                return Ok(());
            }
        };
        let mut system = System::new();
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; skip it so the first sample has a
        // CPU usage baseline to diff against.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    system.refresh_all();
                    match system.process(pid) {
                        Some(process) => {
                            let allocated_mb = process.memory() as f64 / (1024.0 * 1024.0);
                            let total_mb = system.total_memory() as f64 / (1024.0 * 1024.0);
                            let free_mb = system.available_memory() as f64 / (1024.0 * 1024.0);
                            info!(
                                allocated_mb,
                                free_mb,
                                total_mb,
                                cpu_percent = process.cpu_usage(),
                                "resource sample"
                            );
                        }
                        None => warn!("own process missing from system table, skipping sample"),
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn monitor_stops_on_shutdown() {
        let (tx, rx) = watch::channel(false);
        let monitor = ResourceMonitor::new(Duration::from_millis(10));
        let handle = tokio::spawn(monitor.run(rx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        tx.send(true).ok();
        let result = tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}
