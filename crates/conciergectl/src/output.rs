//! Output formatting - plain terminal rendering of responses

use concierge_common::{Action, Basis, ErrorKind, MatchResult, Referent, Response};
use owo_colors::OwoColorize;

/// Display a response to the user
pub fn display_response(response: &Response, show_scores: bool) {
    match response.basis {
        Basis::LowConfidence | Basis::NoMatch => println!("{}", response.text.yellow()),
        _ if response.is_error() => println!("{}", response.text.bright_red()),
        _ => println!("{}", response.text),
    }

    match &response.action {
        Action::NavigateTo(route) => println!("  -> {}", route.cyan()),
        Action::RequestCreated(info) => {
            println!(
                "  [OK] {} ({} x {}, {})",
                info.reference.bright_green(),
                info.quantity,
                info.category,
                info.created_at.format("%Y-%m-%d %H:%M UTC")
            );
        }
        Action::Error(ErrorKind::ExternalCallFailed { retry: Some(command) }) => {
            println!("  retry with: {}", command.to_utterance().cyan());
        }
        Action::ShowEntities(_) | Action::Error(_) | Action::None => {}
    }

    if show_scores {
        println!("{}", score_line(response).dimmed());
    }
}

/// One-line diagnostic: basis, intent, score
pub fn score_line(response: &Response) -> String {
    match (&response.intent, response.score) {
        (Some(intent), Some(score)) => {
            format!("[{:?}] {} score={:.3}", response.basis, intent, score)
        }
        _ => format!("[{:?}]", response.basis),
    }
}

/// Render ranked suggestions
pub fn display_suggestions(matches: &[MatchResult], show_scores: bool) {
    if matches.is_empty() {
        println!("{}", "No suggestions.".yellow());
        return;
    }
    for (i, m) in matches.iter().enumerate() {
        if show_scores {
            println!("{}. {} {}", i + 1, m.item.display_name(), format!("({:.3})", m.score).dimmed());
        } else {
            println!("{}. {}", i + 1, m.item.display_name());
        }
    }
}

/// Short vendor line used by the chat loop's `list` command
pub fn entity_line(position: usize, entity: &Referent) -> String {
    let mut line = format!("{}. {}", position, entity.name);
    if let Some(location) = &entity.location {
        line.push_str(&format!(" - {}", location));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_line_with_match() {
        let r = Response::text(Basis::Confident, "x").with_match("Pricing", 0.4567);
        assert_eq!(score_line(&r), "[Confident] Pricing score=0.457");
    }

    #[test]
    fn test_score_line_without_match() {
        let r = Response::text(Basis::Greeting, "hi");
        assert_eq!(score_line(&r), "[Greeting]");
    }

    #[test]
    fn test_entity_line() {
        let mut e = Referent::new("v1", "PrintCo");
        assert_eq!(entity_line(1, &e), "1. PrintCo");
        e.location = Some("Denver, CO".to_string());
        assert_eq!(entity_line(2, &e), "2. PrintCo - Denver, CO");
    }
}
