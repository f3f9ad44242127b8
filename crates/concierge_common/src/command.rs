//! Quote command grammar
//!
//! `(request quote|quote) <index>[ for <quantity>][ <service>]`, matched
//! case-insensitively against the whole utterance. Anything that does not
//! fit the shape is not a command and falls through to the matcher.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Quantity used when the utterance names none
pub const DEFAULT_QUANTITY: u32 = 100;

static QUOTE_COMMAND: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:request\s+quote|quote)\s+(\d+)(?:\s+for\s+(\d+))?(?:\s+(.+))?$")
        .expect("quote command pattern is valid")
});

/// Slots extracted from one quote command
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteCommand {
    /// 1-based index into the last listing
    pub target_index: usize,
    pub quantity: u32,
    pub service_hint: Option<String>,
}

impl QuoteCommand {
    /// Canonical utterance that reproduces this command
    pub fn to_utterance(&self) -> String {
        let mut text = format!("request quote {} for {}", self.target_index, self.quantity);
        if let Some(hint) = &self.service_hint {
            text.push(' ');
            text.push_str(hint);
        }
        text
    }
}

/// Parse a quote command; `None` when the utterance is not one
pub fn parse_command(utterance: &str) -> Option<QuoteCommand> {
    let text = utterance
        .trim()
        .trim_end_matches(|c: char| matches!(c, '.' | '!' | '?'))
        .trim_end();
    let caps = QUOTE_COMMAND.captures(text)?;

    let target_index = caps.get(1)?.as_str().parse::<usize>().ok()?;
    let quantity = match caps.get(2) {
        Some(q) => q.as_str().parse::<u32>().ok()?,
        None => DEFAULT_QUANTITY,
    };
    let service_hint = caps
        .get(3)
        .map(|s| s.as_str().trim().to_string())
        .filter(|s| !s.is_empty());

    Some(QuoteCommand {
        target_index,
        quantity,
        service_hint,
    })
}
