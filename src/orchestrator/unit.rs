//! Supervised service units.
//!
//! A unit is one long-running task under orchestrator supervision: a
//! WebSocket service, the resource monitor, or an external synthesis
//! process. Units run until they fail or the shared shutdown flag flips;
//! collection is bounded by the grace period, after which a stuck unit is
//! abandoned and reported as a timeout.

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::{Result, VostreamError};
use crate::service::shutdown_signalled;

pub struct ServiceUnit {
    name: &'static str,
    cancel: Arc<watch::Sender<bool>>,
    handle: JoinHandle<Result<()>>,
}

impl ServiceUnit {
    /// Spawn a future as a supervised unit. The future must observe the
    /// receiver side of `cancel` at its suspension points; [`cancel`] only
    /// raises the flag, it never aborts.
    ///
    /// [`cancel`]: ServiceUnit::cancel
    pub fn spawn<F>(name: &'static str, cancel: Arc<watch::Sender<bool>>, future: F) -> Self
    where
        F: Future<Output = Result<()>> + Send + 'static,
    {
        info!(unit = name, "starting unit");
        Self {
            name,
            cancel,
            handle: tokio::spawn(future),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Request cooperative shutdown. Idempotent; units sharing one flag all
    /// see the first call.
    pub fn cancel(&self) {
        self.cancel.send(true).ok();
    }

    /// Wait up to `grace` for the unit to finish and report how it ended.
    /// On expiry the task is aborted so it cannot outlive the orchestrator.
    pub async fn outcome(self, grace: Duration) -> Result<()> {
        let name = self.name;
        let mut handle = self.handle;
        match tokio::time::timeout(grace, &mut handle).await {
            Ok(Ok(result)) => result.map_err(|err| VostreamError::UnitFailed {
                name: name.to_string(),
                message: err.to_string(),
            }),
            Ok(Err(join_err)) => Err(VostreamError::UnitFailed {
                name: name.to_string(),
                message: format!("task panicked: {join_err}"),
            }),
            Err(_) => {
                warn!(unit = name, "unit did not stop within the grace period, aborting");
                handle.abort();
                Err(VostreamError::ShutdownTimeout {
                    name: name.to_string(),
                })
            }
        }
    }
}

/// Run an external process as a unit body. The child is killed when the
/// shutdown flag flips; a nonzero exit before that is a unit failure.
pub async fn run_external(
    name: &'static str,
    exec: String,
    args: Vec<String>,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let mut child = Command::new(&exec)
        .args(&args)
        .stdin(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .map_err(|err| VostreamError::UnitFailed {
            name: name.to_string(),
            message: format!("failed to start '{exec}': {err}"),
        })?;
    info!(unit = name, exec = %exec, "external process started");

    tokio::select! {
        status = child.wait() => {
            let status = status?;
            if status.success() {
                Ok(())
            } else {
                Err(VostreamError::UnitFailed {
                    name: name.to_string(),
                    message: format!("external process exited with {status}"),
                })
            }
        }
        _ = shutdown_signalled(shutdown) => {
            info!(unit = name, "stopping external process");
            child.start_kill().ok();
            child.wait().await?;
            Ok(())
        }
    }
}
