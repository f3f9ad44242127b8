//! CLI - Command-line argument parsing
//!
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Concierge CLI
#[derive(Parser)]
#[command(name = "conciergectl")]
#[command(about = "Concierge - local intent matching and quote requests", long_about = None)]
#[command(version)]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Path to config file (overrides $CONCIERGE_CONFIG and defaults)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Print match scores next to answers
    #[arg(long, global = true)]
    pub show_scores: bool,

    /// Subcommand (if not provided, starts the chat loop)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Answer one utterance
    Ask {
        /// The utterance (words are joined with spaces)
        #[arg(required = true)]
        utterance: Vec<String>,

        /// Output the response as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive conversation with one session
    Chat,

    /// Rank intents for a partial query
    Suggest {
        query: Vec<String>,

        /// Number of suggestions (defaults to the config value)
        #[arg(long)]
        top: Option<usize>,
    },

    /// List loaded intents and their sources
    Intents,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ask_joins_words() {
        let cli = Cli::parse_from(["conciergectl", "ask", "how", "do", "I", "pay"]);
        match cli.command {
            Some(Commands::Ask { utterance, json }) => {
                assert_eq!(utterance.join(" "), "how do I pay");
                assert!(!json);
            }
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["conciergectl", "suggest", "ship", "--top", "5", "--show-scores"]);
        assert!(cli.show_scores);
        assert!(matches!(cli.command, Some(Commands::Suggest { top: Some(5), .. })));
    }

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::parse_from(["conciergectl", "--verbose"]);
        assert!(cli.verbose);
        assert!(cli.command.is_none());
    }
}
