//! REPL - conversational loop over stdin
//!
//! One session for the whole loop, so listings shown earlier can be
//! referenced by number in later quote commands.

use crate::output;
use anyhow::Result;
use concierge_common::{Concierge, Session};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// Lines the loop handles itself instead of sending to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalCommand {
    Exit,
    Help,
    /// Reprint the entities the session currently refers to
    List,
}

pub fn local_command(input: &str) -> Option<LocalCommand> {
    match input.trim().to_lowercase().as_str() {
        "exit" | "quit" | "bye" | ":q" => Some(LocalCommand::Exit),
        "help" | "?" => Some(LocalCommand::Help),
        ":list" => Some(LocalCommand::List),
        _ => None,
    }
}

fn print_help() {
    println!("Ask anything, for example:");
    println!("  how long does shipping take");
    println!("  show business cards");
    println!("  request quote 2 for 250 flyers");
    println!("Type :list to see the current vendors, exit to leave.");
}

fn print_prompt() {
    print!("{} ", ">".bright_cyan());
    let _ = io::stdout().flush();
}

/// Start the conversational loop
pub async fn start_repl(engine: &Concierge, show_scores: bool) -> Result<()> {
    let session = Session::new();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    println!("{}", "Concierge ready. Type help for examples.".bold());

    loop {
        print_prompt();

        let input = match lines.next() {
            Some(Ok(line)) => line.trim().to_string(),
            Some(Err(e)) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
            None => break, // EOF
        };

        if input.is_empty() {
            continue;
        }

        match local_command(&input) {
            Some(LocalCommand::Exit) => {
                println!("Goodbye!");
                break;
            }
            Some(LocalCommand::Help) => print_help(),
            Some(LocalCommand::List) => {
                let context = session.snapshot().await;
                if context.is_empty() {
                    println!("{}", "Nothing listed yet.".yellow());
                }
                for (i, entity) in context.last_shown().iter().enumerate() {
                    println!("{}", output::entity_line(i + 1, entity));
                }
            }
            None => {
                debug!("Turn: {}", input);
                let response = engine.submit(&session, &input).await;
                output::display_response(&response, show_scores);
            }
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_commands() {
        assert_eq!(local_command("quit"), Some(LocalCommand::Exit));
        assert_eq!(local_command("  EXIT "), Some(LocalCommand::Exit));
        assert_eq!(local_command("?"), Some(LocalCommand::Help));
        assert_eq!(local_command(":list"), Some(LocalCommand::List));
    }

    #[test]
    fn test_utterances_go_to_engine() {
        assert_eq!(local_command("list flyers"), None);
        assert_eq!(local_command("quote 1"), None);
        assert_eq!(local_command("how do I exit a checkout"), None);
    }
}
