//! Merchant registration and secret-key verification
//!
//! The directory issues merchant identities and guards every authenticated
//! route. A merchant's secret key is a 25-character random alphanumeric
//! string; only its Argon2id hash (with a per-record random salt) is
//! persisted, so the plaintext exists exactly once, in the registration
//! response. Verification goes through the password-hash machinery, which
//! compares in constant time; plain string equality is never used.

use std::sync::Arc;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::distr::Alphanumeric;
use rand::Rng;
use tracing::debug;

use crate::store::Store;
use crate::types::{Merchant, MerchantError};

/// Length of the plaintext secret issued at registration.
const SECRET_KEY_LENGTH: usize = 25;

/// Merchant identity subsystem
#[derive(Clone)]
pub struct MerchantDirectory {
    store: Arc<dyn Store>,
}

impl MerchantDirectory {
    /// Create a directory over the shared store
    pub fn new(store: Arc<dyn Store>) -> Self {
        MerchantDirectory { store }
    }

    /// Register a new merchant
    ///
    /// Generates a fresh id and secret key, persists the merchant with the
    /// hashed key, and returns `(merchant_id, secret_key)`. This return
    /// value is the only place the plaintext secret ever appears.
    ///
    /// # Errors
    ///
    /// * [`MerchantError::PasswordHash`] if hashing fails
    /// * [`MerchantError::Store`] if the insert fails
    pub async fn register(&self) -> Result<(String, String), MerchantError> {
        let merchant_id = xid::new().to_string();
        let secret_key = generate_secret_key();

        let salt = SaltString::generate(&mut OsRng);
        let hashed_key = Argon2::default()
            .hash_password(secret_key.as_bytes(), &salt)
            .map_err(|e| MerchantError::PasswordHash(e.to_string()))?
            .to_string();

        let merchant = Merchant {
            id: merchant_id.clone(),
            hashed_key,
        };
        self.store.insert_merchant(&merchant).await?;

        debug!(%merchant_id, "merchant registered");
        Ok((merchant_id, secret_key))
    }

    /// Verify a presented secret key for a merchant
    ///
    /// # Errors
    ///
    /// * [`MerchantError::MerchantNotFound`] if the id is unknown
    /// * [`MerchantError::WrongSecretKey`] if the secret does not match
    /// * [`MerchantError::PasswordHash`] / [`MerchantError::Store`] on
    ///   internal failures
    pub async fn is_authenticated(
        &self,
        merchant_id: &str,
        secret_key: &str,
    ) -> Result<(), MerchantError> {
        let merchant = self
            .store
            .find_merchant(merchant_id)
            .await?
            .ok_or(MerchantError::MerchantNotFound)?;

        let parsed = PasswordHash::new(&merchant.hashed_key)
            .map_err(|e| MerchantError::PasswordHash(e.to_string()))?;

        match Argon2::default().verify_password(secret_key.as_bytes(), &parsed) {
            Ok(()) => Ok(()),
            Err(argon2::password_hash::Error::Password) => Err(MerchantError::WrongSecretKey),
            Err(e) => Err(MerchantError::PasswordHash(e.to_string())),
        }
    }
}

/// Draw a secret key uniformly from `[A-Za-z0-9]`
fn generate_secret_key() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SECRET_KEY_LENGTH)
        .map(char::from)
        .collect()
}
