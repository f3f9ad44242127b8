//! Session context - the last listing shown to one conversation.
//!
//! A new listing replaces the previous one wholesale; indices from the old
//! list stop being valid the moment the new one is installed. Each
//! conversation owns its own `SessionContext`; nothing is shared between
//! sessions.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

/// An entity shown in a listing (a vendor)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referent {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub detail_url: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
}

impl Referent {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            rating: None,
            location: None,
            detail_url: None,
            logo_url: None,
            contact_email: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    last_shown: Vec<Referent>,
}

impl SessionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entities(entities: Vec<Referent>) -> Self {
        Self {
            last_shown: entities,
        }
    }

    pub fn last_shown(&self) -> &[Referent] {
        &self.last_shown
    }

    pub fn len(&self) -> usize {
        self.last_shown.len()
    }

    pub fn is_empty(&self) -> bool {
        self.last_shown.is_empty()
    }

    /// Replace the listing; old indices are invalid from here on
    pub fn install(&mut self, entities: Vec<Referent>) {
        debug!(
            "Session listing replaced: {} -> {} entities",
            self.last_shown.len(),
            entities.len()
        );
        self.last_shown = entities;
    }

    /// Entity at a 1-based display index
    pub fn resolve(&self, index: usize) -> Option<&Referent> {
        index.checked_sub(1).and_then(|i| self.last_shown.get(i))
    }
}

/// One conversation: its context plus an in-progress gate.
///
/// `submit` holds the context for the whole turn, including any collaborator
/// call; a second submission arriving meanwhile is turned away as busy.
/// The lock is only this session's turn gate: every session owns its own
/// context and no lock is ever shared between sessions.
#[derive(Debug, Default)]
pub struct Session {
    context: Mutex<SessionContext>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_context(context: SessionContext) -> Self {
        Self {
            context: Mutex::new(context),
        }
    }

    /// Try to take the session for one turn; `None` when a turn is in progress
    pub fn begin_turn(&self) -> Option<tokio::sync::MutexGuard<'_, SessionContext>> {
        self.context.try_lock().ok()
    }

    /// Copy of the current context
    pub async fn snapshot(&self) -> SessionContext {
        self.context.lock().await.clone()
    }
}
