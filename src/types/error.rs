//! Error types for the gateway core
//!
//! Business-rule rejections carry stable, client-visible message strings
//! (two of them with historical misspellings that are preserved verbatim
//! for compatibility). Engine and directory errors wrap them with the
//! context the request layer needs to shape responses: rejections on a
//! live payment include the current snapshot so balances can still be
//! projected into the error body.

use thiserror::Error;

use crate::store::StoreError;
use crate::types::Payment;

/// A state-machine or acquirer rejection with a stable client-facing message
///
/// Each variant maps to exactly one message string that clients match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    /// Requested amount was zero or negative
    #[error("amount should be higher than 0.0")]
    AmountNotPositive,

    /// The mock acquirer refused the operation for this card
    #[error("error based on credit card number")]
    CardDeclined,

    /// The payment was voided; no further operations are allowed
    #[error("payment is cancelled")]
    PaymentCancelled,

    /// Capture would exceed the authorized amount
    #[error("capture amount is higher than authorized")]
    CaptureTooHigh,

    /// Refund would exceed the captured amount
    #[error("refund amount is higher than authorized")]
    RefundTooHigh,

    /// A refund has already occurred (message spelling is historical)
    #[error("cannot perfom this operation because payment was already refunded")]
    AlreadyRefunded,

    /// Funds were already captured, so the authorization cannot be voided
    #[error("cannot perfom this operation because payment was already captured")]
    AlreadyCaptured,

    /// The payment was already voided
    #[error("cannot perfom this operation because payment was already voided")]
    AlreadyVoided,

    /// Nothing has been captured, so there is nothing to refund
    #[error("cannot refund non-captured transaction")]
    NotCaptured,
}

/// Error returned by payment engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Authorization pre-check failed; no payment exists yet
    #[error("{0}")]
    Declined(Rejection),

    /// A state-machine guard rejected the operation
    ///
    /// Carries the payment as read, so the request layer can project the
    /// current balances into the error response.
    #[error("{reason}")]
    Rejected {
        reason: Rejection,
        payment: Box<Payment>,
    },

    /// A concurrent writer won the version race
    ///
    /// Carries the freshly reloaded snapshot. Surfaced as an internal
    /// error; no automatic retry.
    #[error("optimistic locking: could not update document")]
    Conflict(Box<Payment>),

    /// The payment id does not exist in the store
    #[error("payment {0} not found")]
    PaymentNotFound(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl EngineError {
    /// Shorthand for a guard rejection carrying the current snapshot
    pub fn rejected(reason: Rejection, payment: Payment) -> Self {
        EngineError::Rejected {
            reason,
            payment: Box::new(payment),
        }
    }
}

/// Error returned by merchant directory operations
#[derive(Debug, Error)]
pub enum MerchantError {
    #[error("merchant with the given id not found")]
    MerchantNotFound,

    #[error("wrong secret key")]
    WrongSecretKey,

    /// Hashing or hash parsing failed; internal, never client-visible
    #[error("password hash error: {0}")]
    PasswordHash(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
