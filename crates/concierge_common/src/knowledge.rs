//! Knowledge base - the static intent corpus.
//!
//! Loaded once at startup by concatenating sources in order: the built-in
//! set, the generated set shipped in `data/generated_intents.json`, then any
//! extra JSON files from config. Duplicates are kept; every item is an
//! independent scoring candidate and earlier items win ties.

use crate::error::{ConciergeError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

/// Intent names with this prefix are navigable destinations.
pub const NAV_PREFIX: &str = "page:";

const GENERATED_INTENTS: &str = include_str!("../data/generated_intents.json");

/// One answerable topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    /// Display key (not enforced unique)
    pub intent: String,
    /// Literal phrases that force-match this intent
    #[serde(default)]
    pub triggers: Vec<String>,
    /// Canonical answer text
    pub answer: String,
}

impl KnowledgeItem {
    pub fn new(intent: &str, triggers: &[&str], answer: &str) -> Self {
        Self {
            intent: intent.to_string(),
            triggers: triggers.iter().map(|t| t.to_string()).collect(),
            answer: answer.to_string(),
        }
    }

    /// Text indexed for this item: intent name, every trigger, then the answer
    pub fn document_text(&self) -> String {
        let mut parts = Vec::with_capacity(self.triggers.len() + 2);
        parts.push(self.intent.as_str());
        parts.extend(self.triggers.iter().map(String::as_str));
        parts.push(self.answer.as_str());
        parts.join(" ")
    }

    pub fn is_navigable(&self) -> bool {
        self.intent.starts_with(NAV_PREFIX)
    }

    /// Name shown to users, without the navigation tag
    pub fn display_name(&self) -> &str {
        self.intent
            .strip_prefix(NAV_PREFIX)
            .map(str::trim)
            .unwrap_or(&self.intent)
    }

    /// Route for a navigable intent (`page:Order History` -> `/order-history`)
    pub fn route(&self) -> Option<String> {
        if !self.is_navigable() {
            return None;
        }
        let slug = self
            .display_name()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '_' || c == '/')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        Some(format!("/{}", slug))
    }
}

/// Where a block of items came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSummary {
    pub name: String,
    pub count: usize,
}

/// Ordered, immutable intent corpus
#[derive(Debug, Clone, Default)]
pub struct KnowledgeBase {
    items: Vec<KnowledgeItem>,
    sources: Vec<SourceSummary>,
}

impl KnowledgeBase {
    /// Concatenate named sources in order, without de-duplication
    pub fn from_sources(sources: Vec<(String, Vec<KnowledgeItem>)>) -> Result<Self> {
        let mut items = Vec::new();
        let mut summaries = Vec::new();

        for (name, block) in sources {
            for item in &block {
                if item.intent.trim().is_empty() {
                    return Err(ConciergeError::InvalidKnowledge {
                        index: items.len(),
                        reason: format!("intent name is empty (source '{}')", name),
                    });
                }
            }
            summaries.push(SourceSummary {
                name,
                count: block.len(),
            });
            items.extend(block);
        }

        info!(
            "Knowledge base loaded: {} items from {} sources",
            items.len(),
            summaries.len()
        );

        Ok(Self {
            items,
            sources: summaries,
        })
    }

    /// Built-in set followed by the generated set
    pub fn standard() -> Result<Self> {
        Self::from_sources(vec![
            ("builtin".to_string(), builtin_items()),
            ("generated".to_string(), generated_items()?),
        ])
    }

    pub fn items(&self) -> &[KnowledgeItem] {
        &self.items
    }

    pub fn sources(&self) -> &[SourceSummary] {
        &self.sources
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Parse a JSON array of `{intent, triggers, answer}` records
pub fn parse_items(json: &str) -> Result<Vec<KnowledgeItem>> {
    Ok(serde_json::from_str(json)?)
}

/// Load a JSON knowledge file
pub fn load_items_file(path: &Path) -> Result<Vec<KnowledgeItem>> {
    let contents = std::fs::read_to_string(path).map_err(|e| {
        warn!("Cannot read knowledge file {}: {}", path.display(), e);
        e
    })?;
    parse_items(&contents)
}

/// The generated set embedded at compile time
pub fn generated_items() -> Result<Vec<KnowledgeItem>> {
    parse_items(GENERATED_INTENTS)
}

/// Hand-written core intents
pub fn builtin_items() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new(
            "Request a quote",
            &["how do i request a quote", "get a quote", "request quote help"],
            "Ask me to list vendors for a product (for example \"show business cards\"), \
             then say \"request quote <number> for <quantity>\" using the number shown \
             next to the vendor. If you leave out the quantity I will ask for 100 units.",
        ),
        KnowledgeItem::new(
            "Pricing",
            &["how much does it cost", "price list"],
            "Prices are set by each vendor and depend on product, quantity, paper or \
             material, and turnaround time. Request a quote to get an exact price; \
             quotes are free and carry no obligation.",
        ),
        KnowledgeItem::new(
            "Shipping and delivery",
            &["when will my order arrive", "shipping cost"],
            "Vendors ship within their stated turnaround time once artwork is approved. \
             Standard delivery takes 3-5 business days after dispatch, and tracking \
             details are emailed as soon as the parcel leaves the vendor.",
        ),
        KnowledgeItem::new(
            "Artwork files",
            &["file format", "upload artwork"],
            "Upload print-ready PDF files with 3 mm bleed and fonts embedded or \
             outlined. PNG and JPG are accepted at 300 dpi or higher. Vendors send a \
             proof before printing.",
        ),
        KnowledgeItem::new(
            "page:Order History",
            &["my orders", "order history"],
            "Your order history lists every quote and order with its current status.",
        ),
        KnowledgeItem::new(
            "page:Account Settings",
            &["change my password", "account settings"],
            "Account settings let you update your profile, password, and notification \
             preferences.",
        ),
        KnowledgeItem::new(
            "Cancel an order",
            &["cancel my order"],
            "Orders can be cancelled free of charge until the vendor approves the proof. \
             After that, contact the vendor directly using the email on their profile.",
        ),
    ]
}
