//! Persistence interface for the gateway
//!
//! The store is the only component that persists state. It exposes the two
//! document collections (`payments` and `merchants`) through a narrow
//! contract: insert, lookup by id, and a conditional replace that matches
//! on `(id, version)` atomically. The conditional replace is the entire
//! concurrency story; there are no transactions beyond it.
//!
//! Implementations:
//! - [`MongoStore`]: MongoDB-backed production store
//! - [`MemoryStore`]: in-process store for tests and benches

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Merchant, Payment};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Collection names as they appear on disk.
pub const PAYMENTS_COLLECTION: &str = "payments";
pub const MERCHANTS_COLLECTION: &str = "merchants";

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A document with the same logical id already exists
    #[error("duplicate document id {0}")]
    DuplicateId(String),

    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),
}

/// Document persistence for payments and merchants
///
/// `replace_payment` is the optimistic-locking primitive: the filter must
/// match both the id and the expected version in a single atomic step, and
/// the returned count tells the caller whether it won the race.
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a freshly authorized payment
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id already exists.
    async fn insert_payment(&self, payment: &Payment) -> Result<()>;

    /// Look up a payment by id
    async fn find_payment(&self, id: &str) -> Result<Option<Payment>>;

    /// Replace the payment matching `(id, expected_version)`
    ///
    /// Returns the number of documents modified: 1 if this writer won the
    /// version race, 0 if a concurrent writer got there first.
    async fn replace_payment(
        &self,
        id: &str,
        expected_version: i64,
        payment: &Payment,
    ) -> Result<u64>;

    /// Insert a newly registered merchant
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id already exists.
    async fn insert_merchant(&self, merchant: &Merchant) -> Result<()>;

    /// Look up a merchant by id
    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>>;

    /// Delete every document in both collections; test setup only
    async fn clear(&self) -> Result<()>;
}
