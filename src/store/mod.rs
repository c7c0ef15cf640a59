//! # Subscription Store
//!
//! The [`SubscriptionStore`] trait is the only seam between the HTTP layer
//! and persistence. [`PgSubscriptionStore`] is the production backing;
//! [`MemorySubscriptionStore`] applies the same field-presence rules in
//! process and backs the handler tests.

mod memory;
mod postgres;
pub mod query;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::Subscription;

pub use memory::MemorySubscriptionStore;
pub use postgres::PgSubscriptionStore;
pub use query::{FieldSet, FieldValue, Statement};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Update carried no present fields; detected before any SQL is issued
    #[error("no fields to update")]
    NoFieldsToUpdate,

    /// Connectivity, constraint or query failure
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Schema migration failure
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Whether the caller, not the store, is at fault
    pub fn is_caller_error(&self) -> bool {
        matches!(self, StoreError::NoFieldsToUpdate)
    }
}

/// Persistence operations for subscription records.
///
/// Every operation is a single independent statement; there are no
/// transactions spanning calls.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    /// Insert a record; the store assigns `id`.
    async fn insert(&self, sub: &Subscription) -> StoreResult<()>;

    /// Delete by id. Deleting a missing id is not an error.
    async fn delete(&self, id: i64) -> StoreResult<()>;

    /// Fetch by id. A missing id yields the zero record (nil `user_id`).
    async fn get(&self, id: i64) -> StoreResult<Subscription>;

    /// Overwrite only the present fields of `patch`.
    async fn update(&self, id: i64, patch: &Subscription) -> StoreResult<()>;

    /// List records matching every present field of `filter`, or all
    /// records when `filter.all` is set or no field is present.
    async fn list(&self, filter: &Subscription) -> StoreResult<Vec<Subscription>>;
}
