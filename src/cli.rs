//! Command-line interface for vostream
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Streaming speech services over WebSockets
#[derive(Parser, Debug)]
#[command(name = "vostream", version, about = "Streaming speech services over WebSockets")]
pub struct Cli {
    /// Subcommand to execute; default is `serve`
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the orchestrator with both services under supervision
    Serve,

    /// Run only the transcription service
    Asr {
        /// Listen port override
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
    },

    /// Run only the synthesis service
    Tts {
        /// Listen port override
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
    },

    /// Manage synthesis voices
    Voices {
        #[command(subcommand)]
        action: VoicesAction,
    },

    /// Get one conversational reply for a line of text
    Chat {
        /// The text to reply to
        text: Vec<String>,
    },
}

/// Voice store actions
#[derive(Subcommand, Debug)]
pub enum VoicesAction {
    /// List installed voices
    List,

    /// Clone an existing voice under a new name
    Clone {
        /// Voice to copy from
        source: String,
        /// Name of the new voice
        name: String,
        /// Free-form description stored in the voice metadata
        #[arg(long, default_value = "")]
        description: String,
    },

    /// Delete a voice
    Delete {
        /// Voice to remove
        name: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_args_means_serve_by_default() {
        let cli = Cli::parse_from(["vostream"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn asr_port_override_parses() {
        let cli = Cli::parse_from(["vostream", "asr", "--port", "9000"]);
        match cli.command {
            Some(Commands::Asr { port }) => assert_eq!(port, Some(9000)),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn voices_clone_parses_with_description() {
        let cli = Cli::parse_from([
            "vostream", "voices", "clone", "base", "alice", "--description", "warm",
        ]);
        match cli.command {
            Some(Commands::Voices {
                action: VoicesAction::Clone {
                    source,
                    name,
                    description,
                },
            }) => {
                assert_eq!(source, "base");
                assert_eq!(name, "alice");
                assert_eq!(description, "warm");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn global_config_flag_works_after_subcommand() {
        let cli = Cli::parse_from(["vostream", "serve", "--config", "/tmp/v.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/v.toml")));
    }

    #[test]
    fn chat_collects_trailing_words() {
        let cli = Cli::parse_from(["vostream", "chat", "hello", "there"]);
        match cli.command {
            Some(Commands::Chat { text }) => assert_eq!(text, vec!["hello", "there"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
