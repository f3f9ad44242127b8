//! Similarity signals between a query and a document.
//!
//! The combined score is an unnormalized ranking key (weights sum to 1.4).
//! The low-confidence threshold in `synthesizer` is tuned against exactly
//! these weights; change both together or neither.

use crate::vector::{TokenVector, WeightedText};
use serde::Serialize;
use std::collections::HashSet;

pub const COSINE_WEIGHT: f64 = 0.7;
pub const OVERLAP_WEIGHT: f64 = 0.45;
pub const JACCARD_WEIGHT: f64 = 0.25;

/// Cosine similarity; a zero norm is replaced by 1
pub fn cosine(a: &TokenVector, a_norm: f64, b: &TokenVector, b_norm: f64) -> f64 {
    // iterate the smaller map
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    let dot: f64 = small
        .iter()
        .filter_map(|(token, w)| large.get(token).map(|other| w * other))
        .sum();
    let a_norm = if a_norm == 0.0 { 1.0 } else { a_norm };
    let b_norm = if b_norm == 0.0 { 1.0 } else { b_norm };
    dot / (a_norm * b_norm)
}

/// Share of query tokens present in the document (0 for an empty query)
pub fn overlap_ratio(query: &HashSet<String>, doc: &HashSet<String>) -> f64 {
    if query.is_empty() {
        return 0.0;
    }
    let shared = query.iter().filter(|t| doc.contains(*t)).count();
    shared as f64 / query.len() as f64
}

/// Intersection over union (0 when both sets are empty)
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Per-signal breakdown of one query/document comparison
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Scored {
    pub cosine: f64,
    pub overlap: f64,
    pub jaccard: f64,
}

impl Scored {
    pub fn between(query: &WeightedText, doc: &WeightedText) -> Self {
        Self {
            cosine: cosine(&query.weights, query.norm, &doc.weights, doc.norm),
            overlap: overlap_ratio(&query.token_set, &doc.token_set),
            jaccard: jaccard(&query.token_set, &doc.token_set),
        }
    }

    pub fn combined(&self) -> f64 {
        combined_score(self.cosine, self.overlap, self.jaccard)
    }
}

pub fn combined_score(cosine: f64, overlap: f64, jaccard: f64) -> f64 {
    COSINE_WEIGHT * cosine + OVERLAP_WEIGHT * overlap + JACCARD_WEIGHT * jaccard
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::{token_set, tokenize};
    use crate::vector::VectorModel;

    #[test]
    fn test_jaccard_identity_and_empty() {
        let a = token_set("business cards printing");
        assert_eq!(jaccard(&a, &a), 1.0);
        assert_eq!(jaccard(&a, &HashSet::new()), 0.0);
        assert_eq!(jaccard(&HashSet::new(), &HashSet::new()), 0.0);
    }

    #[test]
    fn test_overlap_is_query_oriented() {
        let query = token_set("cards");
        let doc = token_set("business cards printed fast");
        assert_eq!(overlap_ratio(&query, &doc), 1.0);
        assert_eq!(overlap_ratio(&doc, &query), 0.25);
        assert_eq!(overlap_ratio(&HashSet::new(), &doc), 0.0);
    }

    #[test]
    fn test_cosine_zero_norm_yields_zero() {
        let empty = TokenVector::new();
        let mut other = TokenVector::new();
        other.insert("a".to_string(), 1.0);
        let c = cosine(&empty, 0.0, &other, 1.0);
        assert_eq!(c, 0.0);
        assert!(!c.is_nan());
    }

    #[test]
    fn test_cosine_self_similarity_single_document() {
        let text = "Shipping takes three to five days";
        let model = VectorModel::build(vec![tokenize(text)]);
        let query = model.query(text);
        let scored = Scored::between(&query, &model.documents()[0]);
        assert!((scored.cosine - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_combined_weights() {
        assert!((combined_score(1.0, 1.0, 1.0) - 1.4).abs() < 1e-12);
        assert!((combined_score(1.0, 0.0, 0.0) - 0.7).abs() < 1e-12);
        assert!((combined_score(0.0, 1.0, 0.0) - 0.45).abs() < 1e-12);
        assert!((combined_score(0.0, 0.0, 1.0) - 0.25).abs() < 1e-12);
    }
}
