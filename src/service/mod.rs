//! WebSocket service endpoints.
//!
//! Each service binds its listener up front, so a port conflict surfaces as
//! a startup error rather than a unit crash, then serves an axum router with
//! one streaming route and a `/health` probe. Shutdown is a `watch` channel
//! flipped once by the orchestrator: the accept loop drains through axum's
//! graceful shutdown and every open connection sees the same signal.

pub mod asr;
pub mod tts;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::sync::watch;

use crate::error::{Result, VostreamError};

pub use asr::AsrService;
pub use tts::TtsService;

/// Bind a TCP listener, mapping failure to a startup error that names the
/// address. Port 0 binds ephemerally; read the real port from
/// [`BoundListener::addr`].
pub async fn bind(addr: &str) -> Result<BoundListener> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| VostreamError::Bind {
            addr: addr.to_string(),
            source,
        })?;
    let addr = listener.local_addr()?;
    Ok(BoundListener { listener, addr })
}

/// A successfully bound listener, ready to be handed to a service.
#[derive(Debug)]
pub struct BoundListener {
    listener: TcpListener,
    addr: SocketAddr,
}

impl BoundListener {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub(crate) fn into_inner(self) -> TcpListener {
        self.listener
    }
}

/// Resolve once the shutdown flag is raised. Also resolves if the sender
/// side is gone, since no further signal can arrive then.
pub(crate) async fn shutdown_signalled(mut shutdown: watch::Receiver<bool>) {
    while !*shutdown.borrow() {
        if shutdown.changed().await.is_err() {
            break;
        }
    }
}
