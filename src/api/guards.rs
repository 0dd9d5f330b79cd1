//! Authentication and ownership guards
//!
//! Every `/merchant/{merchant_id}/...` route except registration runs the
//! authentication guard: the `Authorization` header carries the raw secret
//! (no scheme prefix) and is verified against the merchant's stored hash.
//! Capture, refund and void additionally run the ownership guard, which
//! resolves the payment's owning merchant and compares it to the path.

use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tracing::{debug, error, warn};

use super::responses::{error_response, internal_error, FORBIDDEN};
use super::AppState;
use crate::types::MerchantError;

/// Length every path id must have, mirroring the `.{20}` route shape.
const PATH_ID_LENGTH: usize = 20;

/// Reject path ids that do not have the 20-character route shape
///
/// A malformed id means the route would never have matched; answer 404
/// like a router miss, not 400.
pub fn check_path_id(id: &str) -> Result<(), Response> {
    if id.chars().count() == PATH_ID_LENGTH {
        Ok(())
    } else {
        Err(StatusCode::NOT_FOUND.into_response())
    }
}

/// Verify the caller's secret key for the path merchant
///
/// `MerchantNotFound` answers 400, a wrong secret 403, anything else 500.
pub async fn authenticate(
    state: &AppState,
    merchant_id: &str,
    headers: &HeaderMap,
) -> Result<(), Response> {
    let secret_key = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match state.merchants.is_authenticated(merchant_id, secret_key).await {
        Ok(()) => Ok(()),
        Err(e @ MerchantError::MerchantNotFound) => {
            debug!(%merchant_id, "authentication failed: unknown merchant");
            Err(error_response(StatusCode::BAD_REQUEST, &e.to_string()))
        }
        Err(e @ MerchantError::WrongSecretKey) => {
            debug!(%merchant_id, "authentication failed: wrong secret key");
            Err(error_response(StatusCode::FORBIDDEN, &e.to_string()))
        }
        Err(e) => {
            error!(%merchant_id, error = %e, "authentication failed internally");
            Err(internal_error())
        }
    }
}

/// Verify that the path merchant owns the path payment
///
/// A lookup failure (including an unknown payment) answers 500; a mismatch
/// answers 403 with the constant `Forbidden` message.
pub async fn check_ownership(
    state: &AppState,
    merchant_id: &str,
    payment_id: &str,
) -> Result<(), Response> {
    let owner = match state.engine.merchant_id_of(payment_id).await {
        Ok(owner) => owner,
        Err(e) => {
            error!(%merchant_id, %payment_id, error = %e, "ownership lookup failed");
            return Err(internal_error());
        }
    };

    if owner != merchant_id {
        warn!(%merchant_id, %payment_id, "ownership mismatch");
        return Err(error_response(StatusCode::FORBIDDEN, FORBIDDEN));
    }

    Ok(())
}
