//! TF-IDF vector model
//!
//! Document statistics are computed once per knowledge-base load; only the
//! query side is weighted per call. The corpus is immutable, so this yields
//! the same scores as rebuilding the statistics for every query.
//!
//! - `idf(t) = ln((N + 1) / (df(t) + 1)) + 1` (positive even when `df = 0`)
//! - `tf(t, d) = count(t in d) / total_tokens(d)`

use crate::knowledge::KnowledgeBase;
use crate::tokenizer::tokenize;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Token -> weight (raw count, tf, or tf-idf depending on stage).
/// Ordered so that sums are evaluated in the same order for equal inputs.
pub type TokenVector = BTreeMap<String, f64>;

/// Raw token counts
pub fn term_counts(tokens: &[String]) -> TokenVector {
    let mut counts = TokenVector::new();
    for token in tokens {
        *counts.entry(token.clone()).or_insert(0.0) += 1.0;
    }
    counts
}

/// Length-normalized term frequency
pub fn term_frequency(tokens: &[String]) -> TokenVector {
    let total = tokens.len() as f64;
    let mut tf = term_counts(tokens);
    if total > 0.0 {
        for weight in tf.values_mut() {
            *weight /= total;
        }
    }
    tf
}

/// Smoothed inverse document frequency
pub fn smoothed_idf(doc_count: usize, doc_freq: usize) -> f64 {
    ((doc_count as f64 + 1.0) / (doc_freq as f64 + 1.0)).ln() + 1.0
}

/// Euclidean norm of a weight vector
pub fn norm(vector: &TokenVector) -> f64 {
    vector.values().map(|w| w * w).sum::<f64>().sqrt()
}

/// Weighted representation of one text
#[derive(Debug, Clone, Default)]
pub struct WeightedText {
    /// Tokens in order
    pub tokens: Vec<String>,
    /// Distinct tokens
    pub token_set: HashSet<String>,
    /// TF-IDF weights
    pub weights: TokenVector,
    /// Norm of `weights`
    pub norm: f64,
}

/// Corpus statistics plus precomputed document vectors
#[derive(Debug, Clone, Default)]
pub struct VectorModel {
    doc_count: usize,
    doc_freq: HashMap<String, usize>,
    documents: Vec<WeightedText>,
}

impl VectorModel {
    /// Build from already tokenized documents
    pub fn build(docs: Vec<Vec<String>>) -> Self {
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        for tokens in &docs {
            let unique: HashSet<&String> = tokens.iter().collect();
            for token in unique {
                *doc_freq.entry(token.clone()).or_insert(0) += 1;
            }
        }

        let mut model = Self {
            doc_count: docs.len(),
            doc_freq,
            documents: Vec::with_capacity(docs.len()),
        };

        let documents: Vec<WeightedText> =
            docs.into_iter().map(|tokens| model.weigh(tokens)).collect();
        model.documents = documents;
        model
    }

    /// One document per knowledge item, in corpus order
    pub fn from_knowledge(kb: &KnowledgeBase) -> Self {
        Self::build(
            kb.items()
                .iter()
                .map(|item| tokenize(&item.document_text()))
                .collect(),
        )
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Number of documents containing `token`
    pub fn doc_freq(&self, token: &str) -> usize {
        self.doc_freq.get(token).copied().unwrap_or(0)
    }

    pub fn idf(&self, token: &str) -> f64 {
        smoothed_idf(self.doc_count, self.doc_freq(token))
    }

    /// TF-IDF weights for a token sequence against this corpus
    pub fn weigh(&self, tokens: Vec<String>) -> WeightedText {
        let mut weights = term_frequency(&tokens);
        for (token, weight) in weights.iter_mut() {
            *weight *= self.idf(token);
        }
        let norm = norm(&weights);
        WeightedText {
            token_set: tokens.iter().cloned().collect(),
            tokens,
            weights,
            norm,
        }
    }

    /// Tokenize and weigh a query
    pub fn query(&self, text: &str) -> WeightedText {
        self.weigh(tokenize(text))
    }

    pub fn documents(&self) -> &[WeightedText] {
        &self.documents
    }
}
