//! In-process store for tests and benches
//!
//! Backed by `DashMap` so concurrent test scenarios see the same
//! serialization behaviour as the production store: operations on the same
//! payment contend on one shard entry, operations on different payments do
//! not interfere. The conditional replace checks the stored version while
//! holding the entry lock, which makes it atomic exactly like the MongoDB
//! filter match.

use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::{Result, Store, StoreError};
use crate::types::{Merchant, Payment};

/// Thread-safe in-memory implementation of [`Store`]
#[derive(Debug, Default)]
pub struct MemoryStore {
    payments: DashMap<String, Payment>,
    merchants: DashMap<String, Merchant>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        match self.payments.entry(payment.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(payment.id.clone())),
            Entry::Vacant(entry) => {
                entry.insert(payment.clone());
                Ok(())
            }
        }
    }

    async fn find_payment(&self, id: &str) -> Result<Option<Payment>> {
        Ok(self.payments.get(id).map(|entry| entry.value().clone()))
    }

    async fn replace_payment(
        &self,
        id: &str,
        expected_version: i64,
        payment: &Payment,
    ) -> Result<u64> {
        // Version check and swap happen under the entry lock, mirroring the
        // atomic (id, version) filter match of the MongoDB replace.
        match self.payments.get_mut(id) {
            Some(mut entry) if entry.version == expected_version => {
                *entry = payment.clone();
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn insert_merchant(&self, merchant: &Merchant) -> Result<()> {
        match self.merchants.entry(merchant.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateId(merchant.id.clone())),
            Entry::Vacant(entry) => {
                entry.insert(merchant.clone());
                Ok(())
            }
        }
    }

    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>> {
        Ok(self.merchants.get(id).map(|entry| entry.value().clone()))
    }

    async fn clear(&self) -> Result<()> {
        self.payments.clear();
        self.merchants.clear();
        Ok(())
    }
}
