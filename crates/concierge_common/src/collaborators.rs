//! External collaborators: auth, catalog, orders.
//!
//! The engine only sees these traits. Calls may be slow or fail; the engine
//! never retries and never times them out itself.
//!
//! ## Implementations
//!
//! `StaticAuth`, `StaticCatalog` and `InMemoryOrders` are in-process
//! implementations used by the CLI and by tests. Each can be told to fail
//! and counts its calls for assertions.

use crate::error::{CollaboratorError, ConciergeError};
use crate::session::Referent;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

// ============================================================================
// Types
// ============================================================================

/// Authenticated identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
}

impl Actor {
    pub fn new(id: &str) -> Self {
        Self { id: id.to_string() }
    }
}

/// Structured quote request sent to the order service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub target_id: String,
    pub actor_id: String,
    pub category: String,
    pub quantity: u32,
    pub note: String,
}

/// Acknowledgement of an accepted request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub reference: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Traits
// ============================================================================

#[async_trait]
pub trait Auth: Send + Sync {
    /// Current actor, or `None` when nobody is signed in
    async fn current_actor(&self) -> Result<Option<Actor>, CollaboratorError>;
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Ordered entities offering a category; empty is a valid answer
    async fn list(&self, category: &str) -> Result<Vec<Referent>, CollaboratorError>;

    /// Categories an entity offers, most relevant first
    async fn categories_of(&self, entity_id: &str) -> Result<Vec<String>, CollaboratorError>;
}

#[async_trait]
pub trait Orders: Send + Sync {
    async fn submit(&self, request: OrderRequest) -> Result<OrderReceipt, CollaboratorError>;
}

// ============================================================================
// Call counting
// ============================================================================

#[derive(Debug, Clone, Default)]
struct CallLog {
    calls: Arc<Mutex<BTreeMap<&'static str, usize>>>,
}

impl CallLog {
    fn record(&self, op: &'static str) {
        let mut calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        *calls.entry(op).or_insert(0) += 1;
    }

    fn count(&self, op: &str) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.get(op).copied().unwrap_or(0)
    }

    fn total(&self) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|e| e.into_inner());
        calls.values().sum()
    }
}

// ============================================================================
// Static auth
// ============================================================================

/// Auth that always reports the same actor (or nobody)
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    actor: Option<Actor>,
    failure: Option<CollaboratorError>,
}

impl StaticAuth {
    pub fn signed_in(actor_id: &str) -> Self {
        Self {
            actor: Some(Actor::new(actor_id)),
            failure: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn failing(error: CollaboratorError) -> Self {
        Self {
            actor: None,
            failure: Some(error),
        }
    }
}

#[async_trait]
impl Auth for StaticAuth {
    async fn current_actor(&self) -> Result<Option<Actor>, CollaboratorError> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(self.actor.clone()),
        }
    }
}

// ============================================================================
// Static catalog
// ============================================================================

/// Catalog backed by a fixed `category -> entities` map
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    listings: BTreeMap<String, Vec<Referent>>,
    failure: Arc<Mutex<Option<CollaboratorError>>>,
    log: CallLog,
}

impl StaticCatalog {
    pub fn new(listings: BTreeMap<String, Vec<Referent>>) -> Self {
        Self {
            listings,
            ..Self::default()
        }
    }

    /// Add or replace one category (builder style)
    pub fn with_category(mut self, category: &str, entities: Vec<Referent>) -> Self {
        self.listings.insert(category.to_string(), entities);
        self
    }

    /// Parse a JSON object of `{ "category": [entity, ...] }`
    pub fn from_json(json: &str) -> Result<Self, ConciergeError> {
        let listings: BTreeMap<String, Vec<Referent>> = serde_json::from_str(json)?;
        Ok(Self::new(listings))
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConciergeError> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// Make every following call fail (or succeed again with `None`)
    pub fn set_failure(&self, failure: Option<CollaboratorError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.listings.keys().map(String::as_str)
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.log.count(op)
    }

    pub fn total_calls(&self) -> usize {
        self.log.total()
    }

    fn check_failure(&self) -> Result<(), CollaboratorError> {
        match &*self.failure.lock().unwrap_or_else(|e| e.into_inner()) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list(&self, category: &str) -> Result<Vec<Referent>, CollaboratorError> {
        self.log.record("list");
        self.check_failure()?;
        Ok(self.listings.get(category).cloned().unwrap_or_default())
    }

    async fn categories_of(&self, entity_id: &str) -> Result<Vec<String>, CollaboratorError> {
        self.log.record("categories_of");
        self.check_failure()?;
        Ok(self
            .listings
            .iter()
            .filter(|(_, entities)| entities.iter().any(|e| e.id == entity_id))
            .map(|(category, _)| category.clone())
            .collect())
    }
}

// ============================================================================
// In-memory orders
// ============================================================================

/// Order service that keeps accepted requests in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrders {
    accepted: Arc<Mutex<Vec<OrderRequest>>>,
    failure: Arc<Mutex<Option<CollaboratorError>>>,
    log: CallLog,
}

impl InMemoryOrders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failure(&self, failure: Option<CollaboratorError>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = failure;
    }

    /// Requests accepted so far, in submission order
    pub fn accepted(&self) -> Vec<OrderRequest> {
        self.accepted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.log.count("submit")
    }
}

#[async_trait]
impl Orders for InMemoryOrders {
    async fn submit(&self, request: OrderRequest) -> Result<OrderReceipt, CollaboratorError> {
        self.log.record("submit");
        if let Some(err) = &*self.failure.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(err.clone());
        }
        self.accepted
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        Ok(OrderReceipt {
            reference: format!("Q-{}", &Uuid::new_v4().simple().to_string()[..8]),
            created_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_catalog_lists_and_counts() {
        let catalog = StaticCatalog::default()
            .with_category("flyers", vec![Referent::new("p1", "PrintCo")]);

        assert_eq!(catalog.list("flyers").await.unwrap().len(), 1);
        assert!(catalog.list("posters").await.unwrap().is_empty());
        assert_eq!(catalog.call_count("list"), 2);
    }

    #[tokio::test]
    async fn test_categories_of_entity() {
        let catalog = StaticCatalog::default()
            .with_category("flyers", vec![Referent::new("p1", "PrintCo")])
            .with_category("apparel", vec![Referent::new("p1", "PrintCo")])
            .with_category("mugs", vec![Referent::new("p2", "MugHouse")]);

        let categories = catalog.categories_of("p1").await.unwrap();
        assert_eq!(categories, vec!["apparel".to_string(), "flyers".to_string()]);
    }

    #[tokio::test]
    async fn test_catalog_from_json() {
        let catalog = StaticCatalog::from_json(
            r#"{"flyers": [{"id": "p1", "name": "PrintCo", "rating": 4.5}]}"#,
        )
        .unwrap();
        let listed = catalog.list("flyers").await.unwrap();
        assert_eq!(listed[0].rating, Some(4.5));
        assert!(StaticCatalog::from_json("[1, 2]").is_err());
    }

    #[tokio::test]
    async fn test_catalog_failure_toggle() {
        let catalog = StaticCatalog::default();
        catalog.set_failure(Some(CollaboratorError::Unavailable("down".into())));
        assert!(catalog.list("flyers").await.is_err());
        catalog.set_failure(None);
        assert!(catalog.list("flyers").await.is_ok());
    }

    #[tokio::test]
    async fn test_orders_record_requests() {
        let orders = InMemoryOrders::new();
        let request = OrderRequest {
            target_id: "p1".into(),
            actor_id: "u1".into(),
            category: "flyers".into(),
            quantity: 100,
            note: "test".into(),
        };
        let receipt = orders.submit(request.clone()).await.unwrap();
        assert!(receipt.reference.starts_with("Q-"));
        assert_eq!(orders.accepted(), vec![request]);
        assert_eq!(orders.call_count(), 1);
    }

    #[tokio::test]
    async fn test_static_auth() {
        assert_eq!(
            StaticAuth::signed_in("u1").current_actor().await.unwrap(),
            Some(Actor::new("u1"))
        );
        assert_eq!(StaticAuth::anonymous().current_actor().await.unwrap(), None);
        assert!(StaticAuth::failing(CollaboratorError::Unavailable("x".into()))
            .current_actor()
            .await
            .is_err());
    }
}
