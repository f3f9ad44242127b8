//! Service synonyms - natural phrases to canonical category codes.
//!
//! Many-to-one: "business cards", "visiting cards" -> `business_cards`.
//! Phrases are stored normalized (lowercase tokens joined by one space) and
//! matched on token boundaries, longest phrase first.

use crate::tokenizer::normalize_phrase;
use std::collections::HashMap;
use tracing::debug;

const BUILTIN_SYNONYMS: &[(&str, &str)] = &[
    ("business cards", "business_cards"),
    ("business card", "business_cards"),
    ("visiting cards", "business_cards"),
    ("name cards", "business_cards"),
    ("t shirt", "apparel"),
    ("t shirts", "apparel"),
    ("tshirt", "apparel"),
    ("tshirts", "apparel"),
    ("tee shirts", "apparel"),
    ("hoodies", "apparel"),
    ("flyers", "flyers"),
    ("flyer", "flyers"),
    ("leaflets", "flyers"),
    ("brochures", "brochures"),
    ("brochure", "brochures"),
    ("banners", "banners"),
    ("banner", "banners"),
    ("vinyl banner", "banners"),
    ("posters", "posters"),
    ("poster", "posters"),
    ("stickers", "stickers"),
    ("labels", "stickers"),
    ("mugs", "promo_items"),
    ("pens", "promo_items"),
    ("promotional items", "promo_items"),
];

/// A phrase found in an utterance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymHit {
    pub phrase: String,
    pub code: String,
}

#[derive(Debug, Clone)]
pub struct SynonymTable {
    /// (normalized phrase, code), longest phrase first
    entries: Vec<(String, String)>,
}

impl SynonymTable {
    pub fn new(pairs: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut merged: HashMap<String, String> = HashMap::new();
        for (phrase, code) in pairs {
            let phrase = normalize_phrase(&phrase);
            if phrase.is_empty() {
                continue;
            }
            merged.insert(phrase, code);
        }

        let mut entries: Vec<(String, String)> = merged.into_iter().collect();
        entries.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SYNONYMS
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string())),
        )
    }

    /// Built-in table with extra pairs layered on top (extras win)
    pub fn with_extra(extra: &HashMap<String, String>) -> Self {
        Self::new(
            BUILTIN_SYNONYMS
                .iter()
                .map(|(p, c)| (p.to_string(), c.to_string()))
                .chain(extra.iter().map(|(p, c)| (p.clone(), c.clone()))),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Longest phrase contained in `text` on token boundaries
    pub fn find_in(&self, text: &str) -> Option<SynonymHit> {
        let haystack = format!(" {} ", normalize_phrase(text));
        self.entries
            .iter()
            .find(|(phrase, _)| haystack.contains(&format!(" {} ", phrase)))
            .map(|(phrase, code)| SynonymHit {
                phrase: phrase.clone(),
                code: code.clone(),
            })
    }

    /// Canonical code for a free-text service hint, or the raw hint itself
    pub fn normalize_service(&self, hint: &str) -> String {
        let normalized = normalize_phrase(hint);
        if let Some((_, code)) = self.entries.iter().find(|(p, _)| *p == normalized) {
            return code.clone();
        }
        if let Some(hit) = self.find_in(hint) {
            debug!("Service hint '{}' resolved via '{}'", hint, hit.phrase);
            return hit.code;
        }
        hint.trim().to_string()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_many_to_one() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize_service("Business Cards"), "business_cards");
        assert_eq!(table.normalize_service("visiting cards"), "business_cards");
        assert_eq!(table.normalize_service("T-Shirt"), "apparel");
    }

    #[test]
    fn test_unknown_hint_passes_through() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize_service("  laser engraving "), "laser engraving");
    }

    #[test]
    fn test_hint_containing_phrase() {
        let table = SynonymTable::builtin();
        assert_eq!(table.normalize_service("glossy business cards"), "business_cards");
    }

    #[test]
    fn test_find_in_respects_token_boundaries() {
        let table = SynonymTable::builtin();
        // "pens" must not match inside "opens"
        assert!(table.find_in("the shop opens at nine").is_none());
        let hit = table.find_in("show me t-shirts please").unwrap();
        assert_eq!(hit.code, "apparel");
        assert_eq!(hit.phrase, "t shirts");
    }

    #[test]
    fn test_longest_phrase_wins() {
        let table = SynonymTable::builtin();
        let hit = table.find_in("I need a vinyl banner").unwrap();
        assert_eq!(hit.phrase, "vinyl banner");
    }

    #[test]
    fn test_extra_entries_override() {
        let mut extra = HashMap::new();
        extra.insert("Flyers".to_string(), "leaflet_print".to_string());
        extra.insert("canvas prints".to_string(), "wall_art".to_string());
        let table = SynonymTable::with_extra(&extra);
        assert_eq!(table.normalize_service("flyers"), "leaflet_print");
        assert_eq!(table.normalize_service("canvas prints"), "wall_art");
    }
}
