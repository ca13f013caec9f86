//! Process supervisor.
//!
//! Binds every listener before spawning anything, so startup errors are
//! fatal and reported once, then supervises the services as units sharing
//! one shutdown flag. The first unit to exit, a signal, or an explicit
//! [`ShutdownHandle::trigger`] flips the flag; every other unit drains
//! within the configured grace period and the aggregate outcome is the
//! run's result.

pub mod monitor;
pub mod unit;

use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::watch;
use tracing::{error, info};

use crate::config::Config;
use crate::error::Result;
use crate::service::{self, AsrService, TtsService, shutdown_signalled};

pub use monitor::{ResourceMonitor, accelerator_present};
pub use unit::ServiceUnit;

/// Remotely triggers orchestrator shutdown. Cheap to clone; triggering more
/// than once is harmless.
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn trigger(&self) {
        self.tx.send(true).ok();
    }
}

pub struct Orchestrator {
    config: Config,
    tx: Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Orchestrator {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            config,
            tx: Arc::new(tx),
            rx,
        }
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.tx.clone(),
        }
    }

    /// Run every service to completion. Returns the first unit failure, or
    /// `Ok(())` when all units drained cleanly.
    pub async fn run(self) -> Result<()> {
        info!(
            state = "starting",
            asr = %self.config.asr_addr(),
            tts = %self.config.tts_addr(),
            grace_secs = self.config.general.shutdown_grace_secs,
            "orchestrator starting"
        );

        // Bind everything before spawning anything; a taken port must fail
        // the whole startup, not crash one unit later.
        let asr_listener = service::bind(&self.config.asr_addr()).await?;
        let external_tts = !self.config.tts.tts_exec.is_empty();
        let tts_listener = if external_tts {
            None
        } else {
            Some(service::bind(&self.config.tts_addr()).await?)
        };

        let mut units = Vec::new();

        let asr = Arc::new(AsrService::new(&self.config.asr, self.rx.clone())?);
        units.push(ServiceUnit::spawn(
            "asr",
            self.tx.clone(),
            supervised(asr.serve(asr_listener), self.tx.clone()),
        ));

        match tts_listener {
            Some(listener) => {
                let tts = Arc::new(TtsService::new(&self.config.tts, self.rx.clone()));
                units.push(ServiceUnit::spawn(
                    "tts",
                    self.tx.clone(),
                    supervised(tts.serve(listener), self.tx.clone()),
                ));
            }
            None => {
                info!(exec = %self.config.tts.tts_exec, "delegating synthesis to external process");
                let body = unit::run_external(
                    "tts-external",
                    self.config.tts.tts_exec.clone(),
                    vec![
                        "--host".to_string(),
                        self.config.tts.host.clone(),
                        "--port".to_string(),
                        self.config.tts.port.to_string(),
                    ],
                    self.rx.clone(),
                );
                units.push(ServiceUnit::spawn(
                    "tts-external",
                    self.tx.clone(),
                    supervised(body, self.tx.clone()),
                ));
            }
        }

        if accelerator_present() {
            let monitor =
                ResourceMonitor::new(Duration::from_secs(crate::defaults::MONITOR_INTERVAL_SECS));
            units.push(ServiceUnit::spawn(
                "monitor",
                self.tx.clone(),
                supervised(monitor.run(self.rx.clone()), self.tx.clone()),
            ));
        } else {
            info!("no accelerator detected, resource monitor disabled");
        }

        info!(state = "running", units = units.len(), "orchestrator running");

        tokio::select! {
            _ = shutdown_signalled(self.rx.clone()) => {
                info!("shutdown requested");
            }
            _ = wait_for_signal() => {
                info!("termination signal received");
            }
        }

        info!(state = "shutting_down", "stopping all units");
        for unit in &units {
            unit.cancel();
        }

        let grace = Duration::from_secs(self.config.general.shutdown_grace_secs);
        let outcomes = join_all(units.into_iter().map(|unit| {
            let name = unit.name();
            async move { (name, unit.outcome(grace).await) }
        }))
        .await;

        let mut first_failure = None;
        for (name, outcome) in outcomes {
            match outcome {
                Ok(()) => info!(unit = name, "unit stopped cleanly"),
                Err(err) => {
                    error!(unit = name, error = %err, "unit failed");
                    first_failure.get_or_insert(err);
                }
            }
        }

        info!(state = "stopped", "orchestrator stopped");
        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Wrap a unit future so that its exit, clean or not, triggers shutdown of
/// everything else. One service dying must not leave the rest serving.
async fn supervised(
    future: impl Future<Output = Result<()>>,
    tx: Arc<watch::Sender<bool>>,
) -> Result<()> {
    let result = future.await;
    tx.send(true).ok();
    result
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};
    let mut term = match signal(SignalKind::terminate()) {
        Ok(term) => term,
        Err(err) => {
            error!(error = %err, "cannot install SIGTERM handler");
            let _ = tokio::signal::ctrl_c().await;
            return;
        }
    };
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {}
        _ = term.recv() => {}
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
