//! Concierge - local intent matching and response synthesis.
//!
//! Given a free-text utterance, the engine either answers from a static
//! knowledge base (TF-IDF + token overlap scoring, confidence gated), lists
//! vendors for a product, or turns a quote command into an order request.
//! No external language service is involved.

pub mod collaborators;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod response;
pub mod session;
pub mod similarity;
pub mod synonyms;
pub mod synthesizer;
pub mod tokenizer;
pub mod vector;

pub use collaborators::{
    Actor, Auth, Catalog, InMemoryOrders, OrderReceipt, OrderRequest, Orders, StaticAuth,
    StaticCatalog,
};
pub use command::{parse_command, QuoteCommand, DEFAULT_QUANTITY};
pub use config::ConciergeConfig;
pub use engine::{Concierge, MAX_LISTED};
pub use error::{CollaboratorError, ConciergeError};
pub use knowledge::{KnowledgeBase, KnowledgeItem};
pub use matcher::{MatchBasis, MatchResult, Matcher};
pub use response::{Action, Basis, ErrorKind, RequestInfo, Response};
pub use session::{Referent, Session, SessionContext};
pub use synonyms::SynonymTable;
pub use tokenizer::tokenize;
