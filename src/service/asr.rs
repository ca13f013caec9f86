//! Streaming transcription endpoint.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::audio::{StreamBuffer, WindowConfig};
use crate::config::AsrConfig;
use crate::defaults;
use crate::engine::{SpeechRecognizer, load_recognizer};
use crate::error::Result;
use crate::service::{BoundListener, shutdown_signalled};
use crate::session::AsrSession;

/// Shared state behind the `/asr` route. One recognizer serves every
/// connection; buffers are per-session.
pub struct AsrService {
    recognizer: Arc<dyn SpeechRecognizer>,
    window: WindowConfig,
    shutdown: watch::Receiver<bool>,
}

impl std::fmt::Debug for AsrService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsrService")
            .field("window", &self.window)
            .finish_non_exhaustive()
    }
}

impl AsrService {
    /// Builds the service, rejecting an invalid window/overlap configuration
    /// up front. Every connection shares these parameters, so a bad config
    /// must fail startup rather than kill each connection as it arrives.
    pub fn new(config: &AsrConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        let window = WindowConfig {
            sample_rate: defaults::SAMPLE_RATE,
            window_secs: config.window_secs,
            overlap_secs: config.overlap_secs,
        };
        StreamBuffer::with_config(window)?;
        Ok(Self {
            recognizer: load_recognizer(config),
            window,
            shutdown,
        })
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/asr", get(ws_handler))
            .route("/health", get(health))
            .with_state(self)
    }

    /// Serve connections until the shutdown flag is raised, then drain.
    pub async fn serve(self: Arc<Self>, listener: BoundListener) -> Result<()> {
        let shutdown = self.shutdown.clone();
        info!(address = %listener.addr(), model = self.recognizer.model_name(), "asr service listening");
        axum::serve(
            listener.into_inner(),
            self.router().into_make_service(),
        )
        .with_graceful_shutdown(shutdown_signalled(shutdown))
        .await?;
        info!("asr service stopped");
        Ok(())
    }
}

async fn health(State(service): State<Arc<AsrService>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": service.recognizer.model_name(),
        "degraded": service.recognizer.is_degraded(),
    }))
}

async fn ws_handler(
    State(service): State<Arc<AsrService>>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| async move {
        if let Err(err) = handle_socket(service, socket).await {
            // Per-connection failures never reach the accept loop.
            error!(error = %err, "asr connection closed with error");
        }
    })
}

async fn handle_socket(service: Arc<AsrService>, mut socket: WebSocket) -> Result<()> {
    let buffer = StreamBuffer::with_config(service.window)?;
    let mut session = AsrSession::new(service.recognizer.clone(), buffer);
    let mut shutdown = service.shutdown.clone();
    info!("asr client connected");

    loop {
        let message = tokio::select! {
            message = socket.recv() => message,
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    socket.send(Message::Close(None)).await.ok();
                    break;
                }
                continue;
            }
        };
        let Some(message) = message else { break };
        let message = message
            .map_err(|err| crate::error::VostreamError::Other(format!("WebSocket error: {err}")))?;

        match message {
            Message::Binary(payload) => {
                for event in session.handle_binary(&payload).await? {
                    let text = serde_json::to_string(&event)?;
                    if socket.send(Message::Text(text)).await.is_err() {
                        return Ok(());
                    }
                }
            }
            Message::Text(text) => {
                if let Err(err) = session.handle_text(&text) {
                    warn!(error = %err, "closing connection on malformed control message");
                    socket.send(Message::Close(None)).await.ok();
                    return Err(err);
                }
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    info!("asr client disconnected");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VostreamError;

    #[test]
    fn valid_config_builds() {
        let (_tx, rx) = watch::channel(false);
        assert!(AsrService::new(&AsrConfig::default(), rx).is_ok());
    }

    #[test]
    fn overlap_not_smaller_than_window_fails_construction() {
        let (_tx, rx) = watch::channel(false);
        let mut config = AsrConfig::default();
        config.overlap_secs = config.window_secs;
        let err = AsrService::new(&config, rx).unwrap_err();
        assert!(matches!(err, VostreamError::ConfigInvalidValue { .. }));
    }
}
