//! Response types returned by `Concierge::respond`.

use crate::command::QuoteCommand;
use crate::session::Referent;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// What produced a response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Basis {
    Greeting,
    DirectTrigger,
    Confident,
    LowConfidence,
    NoMatch,
    Command,
    Listing,
}

/// User-facing failure categories. Text for each lives in `Response::text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ErrorKind {
    /// Nobody is signed in
    AuthRequired,
    /// No listing has been shown yet
    EmptyContext,
    /// Index outside `1..=available`
    IndexOutOfRange { requested: usize, available: usize },
    /// A collaborator call failed; `retry` holds the parsed command, if any
    ExternalCallFailed { retry: Option<QuoteCommand> },
    /// A turn is already in progress for this session
    Busy,
}

/// Details of an accepted quote request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestInfo {
    pub reference: String,
    pub target_id: String,
    pub target_name: String,
    pub category: String,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
    None,
    NavigateTo(String),
    ShowEntities(Vec<Referent>),
    RequestCreated(RequestInfo),
    Error(ErrorKind),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    pub text: String,
    pub action: Action,
    pub basis: Basis,
    /// Matched intent, when the response came from the knowledge base
    #[serde(skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,
    /// Ranking score of that match (diagnostic only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Response {
    pub fn text(basis: Basis, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Action::None,
            basis,
            intent: None,
            score: None,
        }
    }

    pub fn error(kind: ErrorKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            action: Action::Error(kind),
            basis: Basis::Command,
            intent: None,
            score: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    pub fn with_basis(mut self, basis: Basis) -> Self {
        self.basis = basis;
        self
    }

    pub fn with_match(mut self, intent: &str, score: f64) -> Self {
        self.intent = Some(intent.to_string());
        self.score = Some(score);
        self
    }

    pub fn is_error(&self) -> bool {
        matches!(self.action, Action::Error(_))
    }

    pub fn error_kind(&self) -> Option<&ErrorKind> {
        match &self.action {
            Action::Error(kind) => Some(kind),
            _ => None,
        }
    }
}
