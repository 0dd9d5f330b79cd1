//! Merchant entity
//!
//! A merchant is an identity record: an opaque id and the password hash of
//! its secret key. The plaintext secret is handed out exactly once at
//! registration and never persisted.

use serde::{Deserialize, Serialize};

/// Merchant identity as persisted in the `merchants` collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Merchant {
    /// Opaque 20-character identifier, generated server-side
    pub id: String,

    /// Argon2 PHC string of the merchant's secret key
    #[serde(rename = "hashedkey")]
    pub hashed_key: String,
}
