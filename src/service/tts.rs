//! Streaming synthesis endpoint.

use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::TtsConfig;
use crate::engine::{SpeechSynthesizer, load_synthesizer};
use crate::error::Result;
use crate::service::{BoundListener, shutdown_signalled};
use crate::session::TtsSession;

/// Shared state behind the `/tts` route.
pub struct TtsService {
    synthesizer: Arc<dyn SpeechSynthesizer>,
    frame_size: usize,
    shutdown: watch::Receiver<bool>,
}

impl TtsService {
    pub fn new(config: &TtsConfig, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            synthesizer: load_synthesizer(config),
            frame_size: config.frame_size,
            shutdown,
        }
    }

    pub fn router(self: Arc<Self>) -> Router {
        Router::new()
            .route("/tts", get(ws_handler))
            .route("/health", get(health))
            .with_state(self)
    }

    /// Serve connections until the shutdown flag is raised, then drain.
    pub async fn serve(self: Arc<Self>, listener: BoundListener) -> Result<()> {
        let shutdown = self.shutdown.clone();
        info!(address = %listener.addr(), model = self.synthesizer.model_name(), "tts service listening");
        axum::serve(
            listener.into_inner(),
            self.router().into_make_service(),
        )
        .with_graceful_shutdown(shutdown_signalled(shutdown))
        .await?;
        info!("tts service stopped");
        Ok(())
    }
}

async fn health(State(service): State<Arc<TtsService>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "model": service.synthesizer.model_name(),
        "degraded": service.synthesizer.is_degraded(),
    }))
}

async fn ws_handler(
    State(service): State<Arc<TtsService>>,
    upgrade: WebSocketUpgrade,
) -> impl IntoResponse {
    upgrade.on_upgrade(move |socket| async move {
        if let Err(err) = handle_socket(service, socket).await {
            error!(error = %err, "tts connection closed with error");
        }
    })
}

async fn handle_socket(service: Arc<TtsService>, mut socket: WebSocket) -> Result<()> {
    let session = TtsSession::new(service.synthesizer.clone(), service.frame_size);
    let mut shutdown = service.shutdown.clone();
    info!("tts client connected");

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
            Message::Text(text) => match session.handle_text(&text).await {
                Ok(frames) => {
                    for frame in frames {
                        if socket.send(Message::Binary(frame)).await.is_err() {
                            return Ok(());
                        }
                    }
                }
                Err(err) => {
                    warn!(error = %err, "closing connection on malformed control message");
                    socket.send(Message::Close(None)).await.ok();
                    return Err(err);
                }
            },
            Message::Binary(payload) => {
                debug!(bytes = payload.len(), "ignoring binary frame on tts connection");
            }
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    info!("tts client disconnected");
    Ok(())
}
