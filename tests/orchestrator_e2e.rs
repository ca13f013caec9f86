//! End-to-end tests for the supervised service stack.
//!
//! Everything binds ephemeral ports; health probes go over real HTTP with
//! reqwest. WebSocket protocol behavior is covered by the session unit
//! tests, so these focus on lifecycle: startup, probing, drain, teardown.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

use vostream::config::{AsrConfig, Config, TtsConfig};
use vostream::orchestrator::Orchestrator;
use vostream::service::{self, AsrService, TtsService};

fn ephemeral_config() -> Config {
    let mut config = Config::default();
    config.asr.port = 0;
    config.tts.port = 0;
    config.general.shutdown_grace_secs = 2;
    config
}

#[tokio::test]
async fn asr_health_probe_reports_degraded_stand_in() {
    let (tx, rx) = watch::channel(false);
    let listener = service::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.addr();

    let asr = Arc::new(AsrService::new(&AsrConfig::default(), rx).unwrap());
    let serve = tokio::spawn(asr.serve(listener));

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["degraded"], true);

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), serve)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn tts_health_probe_and_graceful_drain() {
    let (tx, rx) = watch::channel(false);
    let listener = service::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.addr();

    let tts = Arc::new(TtsService::new(&TtsConfig::default(), rx));
    let serve = tokio::spawn(tts.serve(listener));

    let body: serde_json::Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["status"], "ok");

    tx.send(true).unwrap();
    tokio::time::timeout(Duration::from_secs(5), serve)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
}

#[tokio::test]
async fn full_stack_starts_and_stops_cleanly() {
    let orchestrator = Orchestrator::new(ephemeral_config());
    let handle = orchestrator.shutdown_handle();
    let run = tokio::spawn(orchestrator.run());

    tokio::time::sleep(Duration::from_millis(200)).await;
    handle.trigger();

    let result = tokio::time::timeout(Duration::from_secs(10), run)
        .await
        .expect("orchestrator did not stop within grace")
        .unwrap();
    assert!(result.is_ok(), "expected clean shutdown, got {result:?}");
}

#[tokio::test]
async fn startup_fails_fast_on_taken_port() {
    let taken = service::bind("127.0.0.1:0").await.unwrap();
    let mut config = ephemeral_config();
    config.tts.port = taken.addr().port();
    config.tts.host = "127.0.0.1".to_string();

    let result = Orchestrator::new(config).run().await;
    assert!(matches!(
        result,
        Err(vostream::VostreamError::Bind { .. })
    ));
}

#[tokio::test]
async fn crashed_external_synthesis_process_fails_the_run() {
    let mut config = ephemeral_config();
    config.tts.tts_exec = "/nonexistent/tts-server".to_string();

    let result = tokio::time::timeout(Duration::from_secs(10), Orchestrator::new(config).run())
        .await
        .expect("run did not settle after external process failure");
    assert!(result.is_err());
}
