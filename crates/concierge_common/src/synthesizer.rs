//! Response synthesis for knowledge questions.
//!
//! Rules, in order:
//! 1. Greeting: a greeting token in an utterance of at most 6 tokens gets the
//!    canned greeting, whatever the knowledge base says.
//! 2. No candidate (empty corpus or no tokens): topic overview fallback.
//! 3. Low confidence (score below 0.12): ask the user to confirm the best
//!    candidate instead of guessing.
//! 4. Confident: navigable intents add a navigate action; process questions
//!    get an offer to walk through the steps; otherwise the answer, capped
//!    at 1200 characters.
//!
//! A direct trigger hit reaches rule 4 with score 1.0.

use crate::matcher::{MatchBasis, MatchResult, Matcher};
use crate::response::{Action, Basis, Response};
use crate::tokenizer::tokenize;
use tracing::debug;

/// Tuned against the 0.7 / 0.45 / 0.25 weighting in `similarity`
pub const LOW_CONFIDENCE_THRESHOLD: f64 = 0.12;
pub const MAX_ANSWER_CHARS: usize = 1200;
pub const GREETING_MAX_TOKENS: usize = 6;

const ELLIPSIS: char = '…';

const GREETING_TOKENS: &[&str] = &[
    "hi", "hello", "hey", "hiya", "howdy", "greetings", "yo",
];

const PROCESS_CUES: &[&str] = &["how", "where", "steps", "process", "quote", "request", "order"];

pub const GREETING_TEXT: &str = "Hello! I can help you find print vendors, request quotes, \
     and answer questions about orders, artwork and delivery. What do you need today?";

pub const FALLBACK_TEXT: &str = "I can help with quotes and pricing, artwork files, \
     shipping and delivery, your orders and account, or finding vendors for a product \
     such as business cards or t-shirts. Could you tell me a bit more about what you need?";

const WALKTHROUGH_OFFER: &str = "Would you like me to walk you through the steps?";

/// Greeting token present and the utterance is short
pub fn is_greeting(tokens: &[String]) -> bool {
    tokens.len() <= GREETING_MAX_TOKENS
        && tokens.iter().any(|t| GREETING_TOKENS.contains(&t.as_str()))
}

fn has_process_cue(tokens: &[String]) -> bool {
    tokens.iter().any(|t| PROCESS_CUES.contains(&t.as_str()))
}

/// Cap text at `MAX_ANSWER_CHARS` characters, ending in an ellipsis when cut
pub fn truncate_answer(text: &str) -> String {
    if text.chars().count() <= MAX_ANSWER_CHARS {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(MAX_ANSWER_CHARS - 1).collect();
    cut.push(ELLIPSIS);
    cut
}

fn clarifying_question(candidate: &MatchResult) -> String {
    format!(
        "I'm not sure I understood. Are you asking about \"{}\"? \
         If not, could you rephrase or add a little more detail?",
        candidate.item.display_name()
    )
}

/// Apply the rules to an utterance and its best match
pub fn synthesize(utterance: &str, best: Option<&MatchResult>) -> Response {
    let tokens = tokenize(utterance);

    if is_greeting(&tokens) {
        return Response::text(Basis::Greeting, GREETING_TEXT);
    }

    let best = match best {
        Some(best) if !tokens.is_empty() => best,
        _ => return Response::text(Basis::NoMatch, FALLBACK_TEXT),
    };

    if best.score < LOW_CONFIDENCE_THRESHOLD {
        debug!(
            "Low confidence ({:.4}) for candidate '{}'",
            best.score, best.item.intent
        );
        return Response::text(Basis::LowConfidence, clarifying_question(best))
            .with_match(&best.item.intent, best.score);
    }

    let basis = match best.basis {
        MatchBasis::DirectTrigger => Basis::DirectTrigger,
        MatchBasis::Statistical => Basis::Confident,
    };

    let response = if let Some(route) = best.item.route() {
        Response::text(basis, best.item.answer.clone()).with_action(Action::NavigateTo(route))
    } else if has_process_cue(&tokens) {
        Response::text(
            basis,
            format!("{}\n\n{}", truncate_answer(&best.item.answer), WALKTHROUGH_OFFER),
        )
    } else {
        Response::text(basis, truncate_answer(&best.item.answer))
    };

    response.with_match(&best.item.intent, best.score)
}

/// Answer an utterance from the knowledge base
pub fn answer(matcher: &Matcher, utterance: &str) -> Response {
    // greetings never consult the matcher
    if is_greeting(&tokenize(utterance)) {
        return Response::text(Basis::Greeting, GREETING_TEXT);
    }
    let best = matcher.find_best_match(utterance);
    synthesize(utterance, best.as_ref())
}
