//! Concierge engine - one utterance in, one response out.
//!
//! Dispatch order for `respond`:
//! 1. Quote command (`request quote 2 for 50 flyers`)
//! 2. Knowledge answer when a trigger phrase is present
//! 3. Category listing (utterance names a known product phrase)
//! 4. Knowledge answer (greeting, statistical match)
//!
//! Only paths 1 and 2 touch collaborators. The session context is written
//! only after a successful catalog response, so a failed call leaves the
//! previous listing intact.

use crate::collaborators::{Auth, Catalog, OrderRequest, Orders};
use crate::command::{parse_command, QuoteCommand};
use crate::matcher::{MatchResult, Matcher};
use crate::response::{Action, Basis, ErrorKind, RequestInfo, Response};
use crate::session::{Referent, Session, SessionContext};
use crate::synonyms::{SynonymHit, SynonymTable};
use crate::synthesizer;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Entities shown per listing
pub const MAX_LISTED: usize = 6;

/// Category used when an entity reports none
pub const FALLBACK_CATEGORY: &str = "general";

pub struct Concierge {
    matcher: Matcher,
    synonyms: SynonymTable,
    auth: Arc<dyn Auth>,
    catalog: Arc<dyn Catalog>,
    orders: Arc<dyn Orders>,
}

impl Concierge {
    pub fn new(
        matcher: Matcher,
        synonyms: SynonymTable,
        auth: Arc<dyn Auth>,
        catalog: Arc<dyn Catalog>,
        orders: Arc<dyn Orders>,
    ) -> Self {
        Self {
            matcher,
            synonyms,
            auth,
            catalog,
            orders,
        }
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    /// Respond to one utterance within a session context
    pub async fn respond(&self, utterance: &str, session: &mut SessionContext) -> Response {
        if let Some(command) = parse_command(utterance) {
            debug!("Quote command parsed: {:?}", command);
            return self.request_quote(command, utterance, session).await;
        }

        // a configured trigger phrase outranks any product mention
        if self.matcher.find_direct_trigger(utterance).is_some() {
            return synthesizer::answer(&self.matcher, utterance);
        }

        if let Some(hit) = self.synonyms.find_in(utterance) {
            debug!("Listing phrase '{}' -> {}", hit.phrase, hit.code);
            return self.show_listing(hit, session).await;
        }

        synthesizer::answer(&self.matcher, utterance)
    }

    /// Respond through a session gate; overlapping turns are rejected as busy
    pub async fn submit(&self, session: &Session, utterance: &str) -> Response {
        let Some(mut context) = session.begin_turn() else {
            warn!("Rejected overlapping submission");
            return Response::error(
                ErrorKind::Busy,
                "I'm still working on your previous message. One moment, please.",
            );
        };
        self.respond(utterance, &mut context).await
    }

    /// Ranked intents for auto-suggest (scores rounded to 3 decimals)
    pub fn suggest(&self, query: &str, n: usize) -> Vec<MatchResult> {
        self.matcher.top_matches(query, n)
    }

    async fn request_quote(
        &self,
        command: QuoteCommand,
        utterance: &str,
        session: &mut SessionContext,
    ) -> Response {
        let actor = match self.auth.current_actor().await {
            Ok(Some(actor)) => actor,
            Ok(None) => {
                return Response::error(
                    ErrorKind::AuthRequired,
                    "Please sign in to request a quote.",
                )
            }
            Err(e) => {
                warn!("Auth lookup failed: {}", e);
                return retry_response(command);
            }
        };

        if session.is_empty() {
            return Response::error(
                ErrorKind::EmptyContext,
                "Ask me to show vendors for a product first (for example \"show business \
                 cards\"), then pick one by its number.",
            );
        }

        let available = session.len();
        let target = match session.resolve(command.target_index) {
            Some(target) => target.clone(),
            None => {
                return Response::error(
                    ErrorKind::IndexOutOfRange {
                        requested: command.target_index,
                        available,
                    },
                    format!(
                        "There is no vendor number {}. Please choose a number between 1 and {}.",
                        command.target_index, available
                    ),
                )
            }
        };

        let category = match &command.service_hint {
            Some(hint) => self.synonyms.normalize_service(hint),
            None => match self.catalog.categories_of(&target.id).await {
                Ok(categories) => categories
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
                Err(e) => {
                    warn!("Category lookup for {} failed: {}", target.id, e);
                    return retry_response(command);
                }
            },
        };

        let request = OrderRequest {
            target_id: target.id.clone(),
            actor_id: actor.id.clone(),
            category: category.clone(),
            quantity: command.quantity,
            note: format!("Requested via assistant: {}", utterance.trim()),
        };

        match self.orders.submit(request).await {
            Ok(receipt) => {
                info!(
                    "Quote request {} submitted: target={} category={} quantity={}",
                    receipt.reference, target.id, category, command.quantity
                );
                let text = format!(
                    "Done! Quote request {} was sent to {} for {} x {}. \
                     They usually reply within one business day.",
                    receipt.reference, target.name, command.quantity, category
                );
                Response::text(Basis::Command, text).with_action(Action::RequestCreated(
                    RequestInfo {
                        reference: receipt.reference,
                        target_id: target.id,
                        target_name: target.name,
                        category,
                        quantity: command.quantity,
                        created_at: receipt.created_at,
                    },
                ))
            }
            Err(e) => {
                warn!("Order submission failed: {}", e);
                retry_response(command)
            }
        }
    }

    async fn show_listing(&self, hit: SynonymHit, session: &mut SessionContext) -> Response {
        let entities = match self.catalog.list(&hit.code).await {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Catalog listing for {} failed: {}", hit.code, e);
                return Response::error(
                    ErrorKind::ExternalCallFailed { retry: None },
                    format!(
                        "Sorry, I couldn't load vendors for {} right now. Please try again in a moment.",
                        hit.phrase
                    ),
                )
                .with_basis(Basis::Listing);
            }
        };

        let total = entities.len();
        let shown: Vec<Referent> = entities.iter().take(MAX_LISTED).cloned().collect();
        session.install(entities);
        info!("Listing installed: {} ({} entities)", hit.code, total);

        let text = if shown.is_empty() {
            format!("I couldn't find any vendors for {} right now.", hit.phrase)
        } else {
            format_listing(&hit.phrase, &shown, total)
        };

        Response::text(Basis::Listing, text).with_action(Action::ShowEntities(shown))
    }
}

fn retry_response(command: QuoteCommand) -> Response {
    let text = format!(
        "Sorry, something went wrong while sending your request. Nothing was lost; \
         please try again with \"{}\".",
        command.to_utterance()
    );
    Response::error(
        ErrorKind::ExternalCallFailed {
            retry: Some(command),
        },
        text,
    )
}

fn format_listing(phrase: &str, shown: &[Referent], total: usize) -> String {
    let mut lines = vec![format!("Here are vendors for {}:", phrase)];
    for (i, entity) in shown.iter().enumerate() {
        let mut line = format!("{}. {}", i + 1, entity.name);
        let mut details = Vec::new();
        if let Some(location) = &entity.location {
            details.push(location.clone());
        }
        if let Some(rating) = entity.rating {
            details.push(format!("rated {:.1}", rating));
        }
        if !details.is_empty() {
            line.push_str(&format!(" ({})", details.join(", ")));
        }
        lines.push(line);
    }
    if total > shown.len() {
        lines.push(format!("Showing {} of {}.", shown.len(), total));
    }
    lines.push(
        "Say \"request quote <number> for <quantity>\" to ask one of them for a quote."
            .to_string(),
    );
    lines.join("\n")
}
