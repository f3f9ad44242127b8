//! Matcher - best match and ranked matches over the knowledge base.
//!
//! A configured trigger phrase found verbatim in the utterance wins outright
//! with score 1.0. Otherwise every document is scored statistically and the
//! highest combined score wins; ties go to the earliest document.

use crate::knowledge::{KnowledgeBase, KnowledgeItem};
use crate::similarity::Scored;
use crate::vector::{VectorModel, WeightedText};
use serde::Serialize;
use tracing::debug;

/// Score assigned to a direct trigger hit
pub const DIRECT_TRIGGER_SCORE: f64 = 1.0;

/// How a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchBasis {
    DirectTrigger,
    Statistical,
}

/// A scored candidate. `score` is a ranking key, not a probability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// Position in the knowledge base
    pub index: usize,
    pub item: KnowledgeItem,
    pub score: f64,
    pub basis: MatchBasis,
    /// Signal breakdown (statistical matches only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signals: Option<Scored>,
}

/// Knowledge base plus its precomputed vector model
#[derive(Debug, Clone, Default)]
pub struct Matcher {
    knowledge: KnowledgeBase,
    model: VectorModel,
}

impl Matcher {
    pub fn new(knowledge: KnowledgeBase) -> Self {
        let model = VectorModel::from_knowledge(&knowledge);
        Self { knowledge, model }
    }

    pub fn knowledge(&self) -> &KnowledgeBase {
        &self.knowledge
    }

    pub fn model(&self) -> &VectorModel {
        &self.model
    }

    /// First intent (in corpus order) with a trigger contained in the utterance
    pub fn find_direct_trigger(&self, utterance: &str) -> Option<MatchResult> {
        let lower = utterance.to_lowercase();
        for (index, item) in self.knowledge.items().iter().enumerate() {
            let hit = item.triggers.iter().any(|trigger| {
                let trigger = trigger.trim().to_lowercase();
                !trigger.is_empty() && lower.contains(&trigger)
            });
            if hit {
                debug!("Direct trigger hit: '{}'", item.intent);
                return Some(MatchResult {
                    index,
                    item: item.clone(),
                    score: DIRECT_TRIGGER_SCORE,
                    basis: MatchBasis::DirectTrigger,
                    signals: None,
                });
            }
        }
        None
    }

    /// Score every document against a weighted query, in corpus order
    pub fn score_all(&self, query: &WeightedText) -> Vec<Scored> {
        self.model
            .documents()
            .iter()
            .map(|doc| Scored::between(query, doc))
            .collect()
    }

    /// Best statistical match; `None` only when the corpus is empty
    pub fn best_statistical(&self, query: &WeightedText) -> Option<MatchResult> {
        let mut best: Option<(usize, Scored, f64)> = None;
        for (index, scored) in self.score_all(query).into_iter().enumerate() {
            let score = scored.combined();
            match best {
                // strict comparison keeps the earliest document on ties
                Some((_, _, best_score)) if score <= best_score => {}
                _ => best = Some((index, scored, score)),
            }
        }

        best.map(|(index, scored, score)| MatchResult {
            index,
            item: self.knowledge.items()[index].clone(),
            score,
            basis: MatchBasis::Statistical,
            signals: Some(scored),
        })
    }

    /// Direct trigger override, then the statistical best match
    pub fn find_best_match(&self, utterance: &str) -> Option<MatchResult> {
        if let Some(hit) = self.find_direct_trigger(utterance) {
            return Some(hit);
        }
        let query = self.model.query(utterance);
        let best = self.best_statistical(&query);
        if let Some(m) = &best {
            debug!("Best statistical match: '{}' ({:.4})", m.item.intent, m.score);
        }
        best
    }

    /// Up to `n` statistical matches, descending, scores rounded to 3 decimals
    pub fn top_matches(&self, utterance: &str, n: usize) -> Vec<MatchResult> {
        let query = self.model.query(utterance);
        let mut ranked: Vec<MatchResult> = self
            .score_all(&query)
            .into_iter()
            .enumerate()
            .map(|(index, scored)| MatchResult {
                index,
                item: self.knowledge.items()[index].clone(),
                score: scored.combined(),
                basis: MatchBasis::Statistical,
                signals: Some(scored),
            })
            .collect();

        // stable: equal scores keep corpus order
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        ranked.truncate(n);
        for m in &mut ranked {
            m.score = round3(m.score);
        }
        ranked
    }
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher(items: Vec<KnowledgeItem>) -> Matcher {
        Matcher::new(KnowledgeBase::from_sources(vec![("test".to_string(), items)]).unwrap())
    }

    #[test]
    fn test_empty_corpus_has_no_match() {
        let m = matcher(vec![]);
        assert!(m.find_best_match("anything").is_none());
        assert!(m.top_matches("anything", 5).is_empty());
    }

    #[test]
    fn test_ties_go_to_first_registered() {
        let item = KnowledgeItem::new("Duplicate", &[], "same words here");
        let m = matcher(vec![item.clone(), item]);

        let best = m.find_best_match("same words").unwrap();
        assert_eq!(best.index, 0);
    }

    #[test]
    fn test_direct_trigger_beats_statistics() {
        let m = matcher(vec![
            KnowledgeItem::new(
                "Shipping",
                &[],
                "shipping delivery shipping delivery track parcel",
            ),
            KnowledgeItem::new("Refunds", &["money back"], "Refunds are issued in 5 days."),
        ]);

        let best = m
            .find_best_match("shipping delivery track parcel money back")
            .unwrap();
        assert_eq!(best.item.intent, "Refunds");
        assert_eq!(best.score, 1.0);
        assert_eq!(best.basis, MatchBasis::DirectTrigger);
    }

    #[test]
    fn test_trigger_match_is_case_insensitive() {
        let m = matcher(vec![KnowledgeItem::new("Refunds", &["Money Back"], "x")]);
        assert!(m.find_direct_trigger("I WANT MY MONEY BACK").is_some());
    }

    #[test]
    fn test_blank_triggers_ignored() {
        let m = matcher(vec![KnowledgeItem::new("Blank", &["", "  "], "x")]);
        assert!(m.find_direct_trigger("anything at all").is_none());
    }

    #[test]
    fn test_top_matches_sorted_and_bounded() {
        let m = matcher(vec![
            KnowledgeItem::new("Cards", &[], "business cards printing"),
            KnowledgeItem::new("Flyers", &[], "flyers leaflets printing"),
            KnowledgeItem::new("Shirts", &[], "t shirt apparel"),
            KnowledgeItem::new("Mugs", &[], "mugs promo"),
        ]);

        let top = m.top_matches("business cards printing", 3);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].item.intent, "Cards");
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for result in &top {
            assert!(result.score >= 0.0);
            assert_eq!(result.score, round3(result.score));
        }
    }

    #[test]
    fn test_round3() {
        assert_eq!(round3(0.12345), 0.123);
        assert_eq!(round3(0.9996), 1.0);
    }
}
