//! Command-line interface definition for Drawbook
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for page generation and session management.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Drawbook - AI coloring-book page generator
///
/// Brainstorm coloring page ideas for a topic with an AI text model,
/// render each idea as black-and-white line art with an AI image model,
/// and manage the resulting sessions on local disk.
#[derive(Parser, Debug, Clone)]
#[command(name = "drawbook")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the session storage root directory
    #[arg(long, env = "DRAWBOOK_SESSIONS_ROOT")]
    pub sessions_root: Option<PathBuf>,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Drawbook
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Generate coloring pages for a topic
    Generate {
        /// Topic to brainstorm coloring page ideas for (e.g. "Jungle Animals")
        #[arg(short, long)]
        topic: String,

        /// Number of pages to generate (defaults to the configured count)
        #[arg(short = 'n', long)]
        count: Option<usize>,

        /// Session name to save under (derived from topic and timestamp if omitted)
        #[arg(long)]
        name: Option<String>,

        /// API key for the AI provider
        #[arg(long, env = "DRAWBOOK_API_KEY", hide_env_values = true)]
        api_key: String,
    },

    /// Manage saved sessions
    Sessions {
        /// Session management subcommand
        #[command(subcommand)]
        command: SessionCommand,
    },
}

/// Session management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum SessionCommand {
    /// List all saved sessions
    List,

    /// Show a saved session's topic, ideas, and image paths
    Show {
        /// Session name
        name: String,
    },

    /// Delete a saved session and its image folder
    Delete {
        /// Session name
        name: String,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_generate() {
        let cli = Cli::try_parse_from([
            "drawbook",
            "generate",
            "--topic",
            "Jungle Animals",
            "--api-key",
            "sk-test",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Generate {
            topic,
            count,
            name,
            api_key,
        } = cli.command
        {
            assert_eq!(topic, "Jungle Animals");
            assert_eq!(count, None);
            assert_eq!(name, None);
            assert_eq!(api_key, "sk-test");
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_generate_with_count_and_name() {
        let cli = Cli::try_parse_from([
            "drawbook",
            "generate",
            "--topic",
            "Space",
            "-n",
            "5",
            "--name",
            "space_01",
            "--api-key",
            "sk-test",
        ]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Generate { count, name, .. } = cli.command {
            assert_eq!(count, Some(5));
            assert_eq!(name, Some("space_01".to_string()));
        } else {
            panic!("Expected Generate command");
        }
    }

    #[test]
    fn test_cli_parse_generate_requires_topic() {
        let cli = Cli::try_parse_from(["drawbook", "generate", "--api-key", "sk-test"]);
        assert!(cli.is_err());
    }

    #[test]
    fn test_cli_parse_sessions_list() {
        let cli = Cli::try_parse_from(["drawbook", "sessions", "list"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Sessions { command } = cli.command {
            assert!(matches!(command, SessionCommand::List));
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_show() {
        let cli = Cli::try_parse_from(["drawbook", "sessions", "show", "jungle_01"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Sessions { command } = cli.command {
            if let SessionCommand::Show { name } = command {
                assert_eq!(name, "jungle_01");
            } else {
                panic!("Expected Show subcommand");
            }
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_sessions_delete() {
        let cli = Cli::try_parse_from(["drawbook", "sessions", "delete", "jungle_01"]);
        assert!(cli.is_ok());
        let cli = cli.unwrap();
        if let Commands::Sessions { command } = cli.command {
            if let SessionCommand::Delete { name } = command {
                assert_eq!(name, "jungle_01");
            } else {
                panic!("Expected Delete subcommand");
            }
        } else {
            panic!("Expected Sessions command");
        }
    }

    #[test]
    fn test_cli_parse_config_override() {
        let cli = Cli::try_parse_from(["drawbook", "--config", "custom.yaml", "sessions", "list"]);
        assert!(cli.is_ok());
        assert_eq!(cli.unwrap().config, Some("custom.yaml".to_string()));
    }

    #[test]
    fn test_cli_parse_sessions_root_override() {
        let cli = Cli::try_parse_from([
            "drawbook",
            "--sessions-root",
            "/tmp/sessions",
            "sessions",
            "list",
        ]);
        assert!(cli.is_ok());
        assert_eq!(
            cli.unwrap().sessions_root,
            Some(PathBuf::from("/tmp/sessions"))
        );
    }
}
