//! Tests for knowledge matching and synthesis against the shipped corpus

use concierge_common::knowledge::{builtin_items, KnowledgeItem};
use concierge_common::similarity::Scored;
use concierge_common::synthesizer::{answer, FALLBACK_TEXT, GREETING_TEXT};
use concierge_common::tokenizer::tokenize;
use concierge_common::vector::VectorModel;
use concierge_common::{Action, Basis, KnowledgeBase, MatchBasis, Matcher};

fn standard() -> Matcher {
    Matcher::new(KnowledgeBase::standard().unwrap())
}

#[test]
fn test_tokenize_hello_world() {
    assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
}

#[test]
fn test_single_document_self_cosine() {
    let item = KnowledgeItem::new("Pricing", &["price list"], "Prices depend on quantity.");
    let text = item.document_text();
    let model = VectorModel::build(vec![tokenize(&text)]);
    let scored = Scored::between(&model.query(&text), &model.documents()[0]);
    assert!((scored.cosine - 1.0).abs() < 1e-9);
    assert!((scored.overlap - 1.0).abs() < 1e-12);
    assert!((scored.jaccard - 1.0).abs() < 1e-12);
}

#[test]
fn test_trigger_phrase_always_wins() {
    let m = standard();
    let best = m
        .find_best_match("shipping delivery tracking parcel dispatch, but what's the price list")
        .unwrap();
    assert_eq!(best.item.intent, "Pricing");
    assert_eq!(best.score, 1.0);
    assert_eq!(best.basis, MatchBasis::DirectTrigger);
}

#[test]
fn test_statistical_match_on_shipped_corpus() {
    let m = standard();
    let r = answer(&m, "turnaround");
    assert_eq!(r.basis, Basis::Confident);
    assert_eq!(r.intent.as_deref(), Some("Turnaround time"));
}

#[test]
fn test_unknown_words_ask_for_clarification() {
    let m = standard();
    let r = answer(&m, "xyzzy plugh");
    assert_eq!(r.basis, Basis::LowConfidence);
    // every score is zero, so the first registered intent is the candidate
    assert_eq!(r.intent.as_deref(), Some(builtin_items()[0].intent.as_str()));
    assert!(r.text.contains(builtin_items()[0].display_name()));
}

#[test]
fn test_hi_greets() {
    let r = answer(&standard(), "hi");
    assert_eq!(r.basis, Basis::Greeting);
    assert_eq!(r.text, GREETING_TEXT);
}

#[test]
fn test_blank_utterance_falls_back() {
    let r = answer(&standard(), "   ");
    assert_eq!(r.basis, Basis::NoMatch);
    assert_eq!(r.text, FALLBACK_TEXT);
}

#[test]
fn test_navigable_intent_returns_route() {
    let r = answer(&standard(), "take me to my order history");
    assert_eq!(r.action, Action::NavigateTo("/order-history".to_string()));
}

#[test]
fn test_generated_navigable_intent() {
    let r = answer(&standard(), "open saved designs");
    assert_eq!(r.action, Action::NavigateTo("/saved-designs".to_string()));
}

#[test]
fn test_process_question_offers_walkthrough() {
    let r = answer(&standard(), "how do i request a quote");
    assert!(r.text.contains("walk you through the steps"));
}

#[test]
fn test_top_matches_properties() {
    let m = standard();
    for n in [0, 1, 3, 100] {
        let top = m.top_matches("how long does delivery take after proof approval", n);
        assert!(top.len() <= n);
        assert!(top.len() <= m.knowledge().len());
        for pair in top.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        assert!(top.iter().all(|t| t.score >= 0.0));
    }
}

#[test]
fn test_duplicate_sources_both_scored() {
    let items = builtin_items();
    let kb = KnowledgeBase::from_sources(vec![
        ("a".to_string(), items.clone()),
        ("b".to_string(), items.clone()),
    ])
    .unwrap();
    let m = Matcher::new(kb);
    let top = m.top_matches("artwork pdf bleed", 2);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].item, top[1].item);
    assert_eq!(top[0].score, top[1].score);
    // earlier copy ranks first
    assert!(top[0].index < top[1].index);
}
