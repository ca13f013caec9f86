use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vostream::cli::{Cli, Commands, VoicesAction};
use vostream::config::Config;
use vostream::llm::ChatClient;
use vostream::orchestrator::Orchestrator;
use vostream::service::{self, AsrService, TtsService};
use vostream::voices::VoiceStore;

const CHAT_SYSTEM_PROMPT: &str =
    "You are a helpful voice assistant. Reply in one or two short sentences \
     suitable for being read aloud.";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;
    init_logging(&config.general.log_level);

    info!(version = %vostream::version_string(), "vostream");

    match cli.command {
        None | Some(Commands::Serve) => {
            Orchestrator::new(config).run().await?;
        }
        Some(Commands::Asr { port }) => {
            let mut config = config;
            if let Some(port) = port {
                config.asr.port = port;
            }
            let listener = service::bind(&config.asr_addr()).await?;
            let service = Arc::new(AsrService::new(&config.asr, ctrl_c_shutdown())?);
            service.serve(listener).await?;
        }
        Some(Commands::Tts { port }) => {
            let mut config = config;
            if let Some(port) = port {
                config.tts.port = port;
            }
            let listener = service::bind(&config.tts_addr()).await?;
            let service = Arc::new(TtsService::new(&config.tts, ctrl_c_shutdown()));
            service.serve(listener).await?;
        }
        Some(Commands::Voices { action }) => {
            handle_voices_command(&VoiceStore::new(config.voices_dir()), action)?;
        }
        Some(Commands::Chat { text }) => {
            let text = text.join(" ");
            match ChatClient::from_env(CHAT_SYSTEM_PROMPT) {
                Some(client) => println!("{}", client.reply(&text).await?),
                None => {
                    // No API key configured; echo so the pipeline stays usable.
                    println!("You said: {text}");
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_or_default(&Config::default_path())?,
    };
    Ok(config.with_env_overrides())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// A shutdown flag flipped by the first Ctrl-C, for running a single
/// service without the orchestrator.
fn ctrl_c_shutdown() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("termination signal received");
        tx.send(true).ok();
    });
    rx
}

fn handle_voices_command(store: &VoiceStore, action: VoicesAction) -> Result<()> {
    match action {
        VoicesAction::List => {
            let entries = store.list()?;
            if entries.is_empty() {
                println!("No voices installed in {}", store.root().display());
                return Ok(());
            }
            for entry in entries {
                match entry.metadata {
                    Some(meta) if !meta.source.is_empty() => {
                        println!("{}  (cloned from {}, {})", entry.name, meta.source, meta.created_at);
                    }
                    _ => println!("{}", entry.name),
                }
            }
        }
        VoicesAction::Clone {
            source,
            name,
            description,
        } => {
            let entry = store.clone_voice(&source, &name, &description)?;
            println!("Cloned '{}' to '{}' at {}", source, name, entry.path.display());
        }
        VoicesAction::Delete { name } => {
            store.delete(&name)?;
            println!("Deleted voice '{name}'");
        }
    }
    Ok(())
}
