//! Payment entity and the mock acquirer failure trigger
//!
//! The Payment is the central persisted entity of the gateway. It carries
//! the monetary counters driven by the state machine (authorized, captured,
//! refunded), the void flag, and the version used as the optimistic-locking
//! token. Field renames pin the historical document keys so existing data
//! stays readable (including the misspelled `auhtorized` key).

use serde::{Deserialize, Serialize};

/// Card numbers that trigger a simulated acquirer refusal.
const AUTHORIZATION_FAILURE_CARD: &str = "4000000000000119";
const CAPTURE_FAILURE_CARD: &str = "4000000000000259";
const REFUND_FAILURE_CARD: &str = "4000000000003238";

/// Simulated acquirer failure recorded on a payment at authorization time
///
/// The trigger is derived from the card number once, stored on the payment,
/// and consulted by the engine on each subsequent operation. Persisted as a
/// small integer for on-disk compatibility.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum FailureTrigger {
    /// Regular card, no simulated failure
    #[default]
    None,

    /// Authorization is refused
    AuthorizationFailure,

    /// Captures against the payment are refused
    CaptureFailure,

    /// Refunds against the payment are refused
    RefundFailure,
}

impl FailureTrigger {
    /// Map a card number to its failure trigger
    ///
    /// Total and deterministic: the three designated test card numbers map
    /// to their respective failures, every other card maps to `None`.
    pub fn for_card(card_number: &str) -> Self {
        match card_number {
            AUTHORIZATION_FAILURE_CARD => FailureTrigger::AuthorizationFailure,
            CAPTURE_FAILURE_CARD => FailureTrigger::CaptureFailure,
            REFUND_FAILURE_CARD => FailureTrigger::RefundFailure,
            _ => FailureTrigger::None,
        }
    }
}

impl From<FailureTrigger> for i32 {
    fn from(trigger: FailureTrigger) -> Self {
        match trigger {
            FailureTrigger::None => 0,
            FailureTrigger::AuthorizationFailure => 1,
            FailureTrigger::CaptureFailure => 2,
            FailureTrigger::RefundFailure => 3,
        }
    }
}

impl TryFrom<i32> for FailureTrigger {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FailureTrigger::None),
            1 => Ok(FailureTrigger::AuthorizationFailure),
            2 => Ok(FailureTrigger::CaptureFailure),
            3 => Ok(FailureTrigger::RefundFailure),
            other => Err(format!("invalid failure trigger {}", other)),
        }
    }
}

/// Payment state as persisted in the `payments` collection
///
/// All monetary fields are integer minor units. `merchant_id`, `currency`,
/// `authorized` and `failure` are set at creation and never change; the
/// counters only move through engine operations, each of which bumps
/// `version` and commits with a conditional replace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    /// Opaque 20-character identifier, generated server-side
    pub id: String,

    /// Amount reserved at authorization, in minor units
    ///
    /// The document key keeps the historical misspelling for compatibility
    /// with existing data.
    #[serde(rename = "auhtorized")]
    pub authorized: i64,

    /// Total captured so far; never decreases, never exceeds `authorized`
    pub captured: i64,

    /// Total refunded so far; never decreases, never exceeds `captured`
    pub refunded: i64,

    /// Three uppercase letters, immutable after creation
    pub currency: String,

    /// Owning merchant, immutable after creation
    #[serde(rename = "merchantid")]
    pub merchant_id: String,

    /// Simulated acquirer failure recorded at authorization
    #[serde(rename = "mockfailure")]
    pub failure: FailureTrigger,

    /// Optimistic-locking token, incremented on every successful mutation
    pub version: i64,

    /// Set by void; once true it is never unset
    pub voided: bool,
}

impl Payment {
    /// Create a freshly authorized payment with zero counters
    pub fn new(
        id: String,
        authorized: i64,
        currency: String,
        merchant_id: String,
        failure: FailureTrigger,
    ) -> Self {
        Payment {
            id,
            authorized,
            captured: 0,
            refunded: 0,
            currency,
            merchant_id,
            failure,
            version: 0,
            voided: false,
        }
    }

    /// Headroom left for captures, in minor units
    pub fn available_to_capture(&self) -> i64 {
        self.authorized - self.captured
    }

    /// Captured funds not yet refunded, in minor units
    pub fn available_to_refund(&self) -> i64 {
        self.captured - self.refunded
    }
}
