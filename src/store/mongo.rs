//! MongoDB implementation of the store interface

use mongodb::bson::doc;
use mongodb::options::{ClientOptions, Credential, IndexOptions};
use mongodb::{Client, Collection, IndexModel};
use tracing::debug;

use super::{Result, Store, StoreError, MERCHANTS_COLLECTION, PAYMENTS_COLLECTION};
use crate::config::Config;
use crate::types::{Merchant, Payment};

/// Duplicate-key error code reported by the server on a unique index clash.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// MongoDB-backed implementation of [`Store`]
///
/// One instance wraps one client and is shared across all requests. Both
/// collections carry a unique index on `id`; payment ids are effectively
/// collision-free, the index is a backstop.
pub struct MongoStore {
    payments: Collection<Payment>,
    merchants: Collection<Merchant>,
}

impl MongoStore {
    /// Connect, ping the server, and initialize indexes
    ///
    /// The caller is expected to bound this with the bootstrap deadline.
    pub async fn connect(config: &Config) -> Result<Self> {
        let uri = format!("mongodb://{}:{}", config.db_host, config.db_port);
        let mut options = ClientOptions::parse(&uri).await?;
        options.credential = Some(
            Credential::builder()
                .username(config.db_username.clone())
                .password(config.db_password.clone())
                .build(),
        );

        let client = Client::with_options(options)?;
        let database = client.database(&config.db_name);

        // Fail fast if the server is unreachable
        database.run_command(doc! { "ping": 1 }).await?;
        debug!(db = %config.db_name, "connected to MongoDB");

        let store = Self {
            payments: database.collection(PAYMENTS_COLLECTION),
            merchants: database.collection(MERCHANTS_COLLECTION),
        };
        store.init().await?;

        Ok(store)
    }

    /// Create unique indexes on the logical id of both collections
    async fn init(&self) -> Result<()> {
        let unique_id = |collection: &str| {
            IndexModel::builder()
                .keys(doc! { "id": 1 })
                .options(
                    IndexOptions::builder()
                        .unique(true)
                        .name(format!("{}_id_unique", collection))
                        .build(),
                )
                .build()
        };

        self.payments
            .create_index(unique_id(PAYMENTS_COLLECTION))
            .await?;
        self.merchants
            .create_index(unique_id(MERCHANTS_COLLECTION))
            .await?;

        Ok(())
    }
}

/// Whether a driver error is a unique-index duplicate-key rejection.
fn is_duplicate_key(error: &mongodb::error::Error) -> bool {
    use mongodb::error::{ErrorKind, WriteFailure};

    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}

#[async_trait::async_trait]
impl Store for MongoStore {
    async fn insert_payment(&self, payment: &Payment) -> Result<()> {
        self.payments.insert_one(payment).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateId(payment.id.clone())
            } else {
                StoreError::Mongo(e)
            }
        })?;
        Ok(())
    }

    async fn find_payment(&self, id: &str) -> Result<Option<Payment>> {
        Ok(self.payments.find_one(doc! { "id": id }).await?)
    }

    async fn replace_payment(
        &self,
        id: &str,
        expected_version: i64,
        payment: &Payment,
    ) -> Result<u64> {
        // The filter matches id and version in one atomic step; a zero
        // modified count means a concurrent writer bumped the version first.
        let result = self
            .payments
            .replace_one(doc! { "id": id, "version": expected_version }, payment)
            .await?;
        Ok(result.modified_count)
    }

    async fn insert_merchant(&self, merchant: &Merchant) -> Result<()> {
        self.merchants.insert_one(merchant).await.map_err(|e| {
            if is_duplicate_key(&e) {
                StoreError::DuplicateId(merchant.id.clone())
            } else {
                StoreError::Mongo(e)
            }
        })?;
        Ok(())
    }

    async fn find_merchant(&self, id: &str) -> Result<Option<Merchant>> {
        Ok(self.merchants.find_one(doc! { "id": id }).await?)
    }

    async fn clear(&self) -> Result<()> {
        self.payments.delete_many(doc! {}).await?;
        self.merchants.delete_many(doc! {}).await?;
        Ok(())
    }
}
