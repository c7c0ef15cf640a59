//! In-memory subscription store
//!
//! Applies the same presence rules as the Postgres store through
//! [`FieldSet`], so handlers can be exercised without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::query::{self, FieldSet};
use super::{StoreResult, SubscriptionStore};
use crate::models::Subscription;

#[derive(Debug, Default)]
struct Inner {
    next_id: i64,
    rows: BTreeMap<i64, Subscription>,
    statements: usize,
}

/// Subscription store held entirely in process memory
#[derive(Debug, Default)]
pub struct MemorySubscriptionStore {
    inner: Mutex<Inner>,
}

impl MemorySubscriptionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of statements that reached the store
    pub async fn statement_count(&self) -> usize {
        self.inner.lock().await.statements
    }

    pub async fn len(&self) -> usize {
        self.inner.lock().await.rows.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.rows.is_empty()
    }
}

#[async_trait]
impl SubscriptionStore for MemorySubscriptionStore {
    async fn insert(&self, sub: &Subscription) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.statements += 1;
        inner.next_id += 1;
        let id = inner.next_id;
        let record = Subscription {
            id,
            all: false,
            ..sub.clone()
        };
        inner.rows.insert(id, record);
        Ok(())
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        let mut inner = self.inner.lock().await;
        inner.statements += 1;
        inner.rows.remove(&id);
        Ok(())
    }

    async fn get(&self, id: i64) -> StoreResult<Subscription> {
        let mut inner = self.inner.lock().await;
        inner.statements += 1;
        Ok(inner.rows.get(&id).cloned().unwrap_or_default())
    }

    async fn update(&self, id: i64, patch: &Subscription) -> StoreResult<()> {
        // Same gate as the SQL path: refuse before touching the store.
        query::update_statement(id, patch)?;

        let mut inner = self.inner.lock().await;
        inner.statements += 1;
        if let Some(record) = inner.rows.get_mut(&id) {
            FieldSet::from_subscription(patch).apply_to(record);
        }
        Ok(())
    }

    async fn list(&self, filter: &Subscription) -> StoreResult<Vec<Subscription>> {
        let fields = FieldSet::from_subscription(filter);
        let mut inner = self.inner.lock().await;
        inner.statements += 1;
        Ok(inner
            .rows
            .values()
            .filter(|record| filter.all || fields.matches(record))
            .cloned()
            .collect())
    }
}
