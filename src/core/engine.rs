//! Payment state machine
//!
//! This module provides the PaymentEngine that owns the Payment lifecycle:
//! authorize, capture, refund and void. Every mutation follows the same
//! protocol against the store: read the current document, evaluate the
//! guards in a fixed order, compute the new document in memory, and commit
//! it with a conditional replace on `(id, version)`.
//!
//! The engine enforces the monetary invariants at every committed state:
//! - `0 <= refunded <= captured <= authorized`
//! - `voided` implies `captured == 0` and `refunded == 0`
//! - `version` strictly increases per payment
//!
//! Guard order matters and is part of the contract: the first matching
//! guard decides which rejection the caller sees.

use std::sync::Arc;

use tracing::debug;

use crate::store::Store;
use crate::types::{EngineError, FailureTrigger, Payment, Rejection};

/// Payment lifecycle engine
///
/// Holds a shared store handle and no other state; correctness under
/// concurrent requests rests entirely on the conditional replace.
#[derive(Clone)]
pub struct PaymentEngine {
    store: Arc<dyn Store>,
}

impl PaymentEngine {
    /// Create an engine over the shared store
    pub fn new(store: Arc<dyn Store>) -> Self {
        PaymentEngine { store }
    }

    /// Reserve funds and create the payment
    ///
    /// Pre-checks, in order: an `AuthorizationFailure` trigger declines the
    /// card; a non-positive amount is rejected. Otherwise a pristine
    /// payment (zero counters, version 0) is inserted and its id returned.
    ///
    /// # Errors
    ///
    /// * [`EngineError::Declined`] on a failing pre-check
    /// * [`EngineError::Store`] if the insert fails
    pub async fn authorize(
        &self,
        amount: i64,
        currency: &str,
        merchant_id: &str,
        failure: FailureTrigger,
    ) -> Result<String, EngineError> {
        if failure == FailureTrigger::AuthorizationFailure {
            return Err(EngineError::Declined(Rejection::CardDeclined));
        }
        if amount <= 0 {
            return Err(EngineError::Declined(Rejection::AmountNotPositive));
        }

        let payment = Payment::new(
            xid::new().to_string(),
            amount,
            currency.to_string(),
            merchant_id.to_string(),
            failure,
        );
        self.store.insert_payment(&payment).await?;

        debug!(payment_id = %payment.id, amount, currency, "payment authorized");
        Ok(payment.id)
    }

    /// Debit part or all of the authorized amount
    ///
    /// Guards, in order: voided payment; `CaptureFailure` trigger;
    /// non-positive amount; capture headroom (`captured + amount` must not
    /// exceed `authorized`); any prior refund blocks further captures even
    /// if headroom remains.
    ///
    /// # Errors
    ///
    /// * [`EngineError::Rejected`] with the deciding guard and the current
    ///   snapshot
    /// * [`EngineError::Conflict`] if a concurrent writer won the version
    ///   race (carries the reloaded snapshot)
    /// * [`EngineError::PaymentNotFound`] / [`EngineError::Store`]
    pub async fn capture(&self, payment_id: &str, amount: i64) -> Result<Payment, EngineError> {
        let payment = self.load(payment_id).await?;

        if payment.voided {
            return Err(EngineError::rejected(Rejection::PaymentCancelled, payment));
        }
        if payment.failure == FailureTrigger::CaptureFailure {
            return Err(EngineError::rejected(Rejection::CardDeclined, payment));
        }
        if amount <= 0 {
            return Err(EngineError::rejected(Rejection::AmountNotPositive, payment));
        }
        if payment.captured + amount > payment.authorized {
            return Err(EngineError::rejected(Rejection::CaptureTooHigh, payment));
        }
        if payment.refunded > 0 {
            return Err(EngineError::rejected(Rejection::AlreadyRefunded, payment));
        }

        let expected_version = payment.version;
        let mut updated = payment;
        updated.captured += amount;
        updated.version += 1;

        self.commit(expected_version, updated).await
    }

    /// Return part or all of the captured amount
    ///
    /// Guards, in order: voided payment; nothing captured yet;
    /// `RefundFailure` trigger; non-positive amount; refund headroom
    /// (`refunded + amount` must not exceed `captured`).
    ///
    /// # Errors
    ///
    /// Same classes as [`PaymentEngine::capture`].
    pub async fn refund(&self, payment_id: &str, amount: i64) -> Result<Payment, EngineError> {
        let payment = self.load(payment_id).await?;

        if payment.voided {
            return Err(EngineError::rejected(Rejection::PaymentCancelled, payment));
        }
        if payment.captured == 0 {
            return Err(EngineError::rejected(Rejection::NotCaptured, payment));
        }
        if payment.failure == FailureTrigger::RefundFailure {
            return Err(EngineError::rejected(Rejection::CardDeclined, payment));
        }
        if amount <= 0 {
            return Err(EngineError::rejected(Rejection::AmountNotPositive, payment));
        }
        if payment.refunded + amount > payment.captured {
            return Err(EngineError::rejected(Rejection::RefundTooHigh, payment));
        }

        let expected_version = payment.version;
        let mut updated = payment;
        updated.refunded += amount;
        updated.version += 1;

        self.commit(expected_version, updated).await
    }

    /// Cancel the whole authorization
    ///
    /// Only legal from the pristine authorized state. Guards, in order:
    /// already voided; any refund; any capture.
    ///
    /// # Errors
    ///
    /// Same classes as [`PaymentEngine::capture`].
    pub async fn void(&self, payment_id: &str) -> Result<Payment, EngineError> {
        let payment = self.load(payment_id).await?;

        if payment.voided {
            return Err(EngineError::rejected(Rejection::AlreadyVoided, payment));
        }
        if payment.refunded != 0 {
            return Err(EngineError::rejected(Rejection::AlreadyRefunded, payment));
        }
        if payment.captured != 0 {
            return Err(EngineError::rejected(Rejection::AlreadyCaptured, payment));
        }

        let expected_version = payment.version;
        let mut updated = payment;
        updated.voided = true;
        updated.version += 1;

        self.commit(expected_version, updated).await
    }

    /// Resolve the owning merchant of a payment
    ///
    /// Used by the ownership guard in front of capture, refund and void.
    pub async fn merchant_id_of(&self, payment_id: &str) -> Result<String, EngineError> {
        let payment = self.load(payment_id).await?;
        Ok(payment.merchant_id)
    }

    async fn load(&self, payment_id: &str) -> Result<Payment, EngineError> {
        self.store
            .find_payment(payment_id)
            .await?
            .ok_or_else(|| EngineError::PaymentNotFound(payment_id.to_string()))
    }

    /// Commit an updated document under the optimistic-locking guard
    ///
    /// Zero modified documents means a concurrent writer bumped the version
    /// between our read and this replace; the loser reloads and surfaces
    /// the conflict with the fresh snapshot.
    async fn commit(&self, expected_version: i64, updated: Payment) -> Result<Payment, EngineError> {
        let modified = self
            .store
            .replace_payment(&updated.id, expected_version, &updated)
            .await?;

        if modified == 0 {
            let current = self.load(&updated.id).await?;
            debug!(
                payment_id = %updated.id,
                expected_version,
                current_version = current.version,
                "optimistic lock conflict"
            );
            return Err(EngineError::Conflict(Box::new(current)));
        }

        Ok(updated)
    }
}
