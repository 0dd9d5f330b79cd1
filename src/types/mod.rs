//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `payment`: Payment entity and the mock acquirer failure trigger
//! - `merchant`: Merchant identity record
//! - `money`: minor-unit money conversions
//! - `error`: Error types for the gateway core

pub mod error;
pub mod merchant;
pub mod money;
pub mod payment;

pub use error::{EngineError, MerchantError, Rejection};
pub use merchant::Merchant;
pub use payment::{FailureTrigger, Payment};
