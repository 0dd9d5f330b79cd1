//! Response shapes and balance projection
//!
//! Transaction responses always derive `available_to_capture` from
//! `authorized - captured` and `available_to_refund` from
//! `captured - refunded`, except for a small table of overrides that force
//! one or both sides to `"0.00"` on specific outcomes. The overrides are
//! part of the client contract, not formatting accidents; the tests pin
//! every row.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::types::money::format_minor_units;
use crate::types::{Payment, Rejection};

const ZERO: &str = "0.00";

/// Message body for plain error responses.
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";
pub const BAD_REQUEST: &str = "Bad Request";
pub const FORBIDDEN: &str = "Forbidden";

/// Registration response: the only place the plaintext secret appears
#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub merchant_id: String,
    pub secret_key: String,
}

/// Successful authorization response
#[derive(Debug, Serialize)]
pub struct AuthorizeResponse {
    pub payment_id: String,
    pub available_to_capture: String,
    pub available_to_refund: String,
    pub currency: String,
}

/// Capture/refund/void response, also used as their 400 error body
#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct TransactionResponse {
    pub available_to_capture: String,
    pub available_to_refund: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub currency: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub error: String,
}

impl TransactionResponse {
    fn projected(payment: &Payment, rejection: Option<Rejection>) -> Self {
        TransactionResponse {
            available_to_capture: format_minor_units(payment.available_to_capture()),
            available_to_refund: format_minor_units(payment.available_to_refund()),
            currency: payment.currency.clone(),
            error: rejection.map(|r| r.to_string()).unwrap_or_default(),
        }
    }
}

/// Plain `{"error": ...}` body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Build a JSON error response with the given status
pub fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorBody {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Shorthand for the constant 500 response
pub fn internal_error() -> Response {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
}

/// Project a capture outcome into a response body
///
/// Overrides: a cancelled payment shows `"0.00"` on both sides; an
/// already-refunded payment zeroes only the capture side.
pub fn project_capture(payment: &Payment, rejection: Option<Rejection>) -> TransactionResponse {
    let mut response = TransactionResponse::projected(payment, rejection);
    match rejection {
        Some(Rejection::AlreadyRefunded) => {
            response.available_to_capture = ZERO.to_string();
        }
        Some(Rejection::PaymentCancelled) => {
            response.available_to_capture = ZERO.to_string();
            response.available_to_refund = ZERO.to_string();
        }
        _ => {}
    }
    response
}

/// Project a refund outcome into a response body
///
/// Starts from `"0.00"` on both sides: a cancelled payment keeps both; a
/// not-captured payment shows only the capture side; other rejections show
/// both computed values; success shows only the refund side (the capture
/// side stays `"0.00"` because a refunded payment can never capture again).
pub fn project_refund(payment: &Payment, rejection: Option<Rejection>) -> TransactionResponse {
    let mut response = TransactionResponse {
        available_to_capture: ZERO.to_string(),
        available_to_refund: ZERO.to_string(),
        currency: payment.currency.clone(),
        error: rejection.map(|r| r.to_string()).unwrap_or_default(),
    };
    match rejection {
        Some(Rejection::PaymentCancelled) => {}
        Some(Rejection::NotCaptured) => {
            response.available_to_capture = format_minor_units(payment.available_to_capture());
        }
        Some(_) => {
            response.available_to_capture = format_minor_units(payment.available_to_capture());
            response.available_to_refund = format_minor_units(payment.available_to_refund());
        }
        None => {
            response.available_to_refund = format_minor_units(payment.available_to_refund());
        }
    }
    response
}

/// Project a void outcome into a response body
///
/// Success and an already-voided payment show `"0.00"` on both sides; an
/// already-refunded payment zeroes the capture side and keeps the refund
/// side; an already-captured payment shows both computed values.
pub fn project_void(payment: &Payment, rejection: Option<Rejection>) -> TransactionResponse {
    let mut response = TransactionResponse::projected(payment, rejection);
    match rejection {
        Some(Rejection::AlreadyCaptured) => {}
        Some(Rejection::AlreadyRefunded) => {
            response.available_to_capture = ZERO.to_string();
        }
        _ => {
            response.available_to_capture = ZERO.to_string();
            response.available_to_refund = ZERO.to_string();
        }
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FailureTrigger;
    use rstest::rstest;

    fn payment(authorized: i64, captured: i64, refunded: i64) -> Payment {
        let mut p = Payment::new(
            "c8g0000000000000000a".to_string(),
            authorized,
            "USD".to_string(),
            "c8g0000000000000000b".to_string(),
            FailureTrigger::None,
        );
        p.captured = captured;
        p.refunded = refunded;
        p
    }

    #[rstest]
    #[case::success(payment(9900, 9900, 0), None, "0.00", "99.00")]
    #[case::partial_success(payment(10000, 6000, 0), None, "40.00", "60.00")]
    #[case::too_high(payment(10000, 0, 0), Some(Rejection::CaptureTooHigh), "100.00", "0.00")]
    #[case::zero_amount(payment(10000, 0, 0), Some(Rejection::AmountNotPositive), "100.00", "0.00")]
    #[case::card_declined(payment(1000, 0, 0), Some(Rejection::CardDeclined), "10.00", "0.00")]
    #[case::already_refunded(payment(3000, 1000, 500), Some(Rejection::AlreadyRefunded), "0.00", "5.00")]
    #[case::cancelled(payment(9900, 0, 0), Some(Rejection::PaymentCancelled), "0.00", "0.00")]
    fn test_capture_projection(
        #[case] payment: Payment,
        #[case] rejection: Option<Rejection>,
        #[case] capture_side: &str,
        #[case] refund_side: &str,
    ) {
        let response = project_capture(&payment, rejection);
        assert_eq!(response.available_to_capture, capture_side);
        assert_eq!(response.available_to_refund, refund_side);
        assert_eq!(
            response.error,
            rejection.map(|r| r.to_string()).unwrap_or_default()
        );
    }

    #[rstest]
    #[case::success(payment(9900, 9900, 9000), None, "0.00", "9.00")]
    #[case::success_partial_capture(payment(9900, 5000, 1000), None, "0.00", "40.00")]
    #[case::too_high(payment(9900, 9900, 9000), Some(Rejection::RefundTooHigh), "0.00", "9.00")]
    #[case::too_high_partial(payment(9900, 100, 0), Some(Rejection::RefundTooHigh), "98.00", "1.00")]
    #[case::zero_amount(payment(9900, 9900, 0), Some(Rejection::AmountNotPositive), "0.00", "99.00")]
    #[case::card_declined(payment(9900, 9900, 0), Some(Rejection::CardDeclined), "0.00", "99.00")]
    #[case::not_captured(payment(9900, 0, 0), Some(Rejection::NotCaptured), "99.00", "0.00")]
    #[case::cancelled(payment(9900, 0, 0), Some(Rejection::PaymentCancelled), "0.00", "0.00")]
    fn test_refund_projection(
        #[case] payment: Payment,
        #[case] rejection: Option<Rejection>,
        #[case] capture_side: &str,
        #[case] refund_side: &str,
    ) {
        let response = project_refund(&payment, rejection);
        assert_eq!(response.available_to_capture, capture_side);
        assert_eq!(response.available_to_refund, refund_side);
    }

    #[rstest]
    #[case::success(payment(9900, 0, 0), None, "0.00", "0.00")]
    #[case::already_voided(payment(9900, 0, 0), Some(Rejection::AlreadyVoided), "0.00", "0.00")]
    #[case::already_captured(payment(9900, 5000, 0), Some(Rejection::AlreadyCaptured), "49.00", "50.00")]
    #[case::already_refunded(payment(9900, 5000, 1000), Some(Rejection::AlreadyRefunded), "0.00", "40.00")]
    fn test_void_projection(
        #[case] payment: Payment,
        #[case] rejection: Option<Rejection>,
        #[case] capture_side: &str,
        #[case] refund_side: &str,
    ) {
        let response = project_void(&payment, rejection);
        assert_eq!(response.available_to_capture, capture_side);
        assert_eq!(response.available_to_refund, refund_side);
    }

    #[test]
    fn test_empty_currency_and_error_are_omitted() {
        let response = TransactionResponse {
            available_to_capture: "1.00".to_string(),
            available_to_refund: "0.00".to_string(),
            currency: String::new(),
            error: String::new(),
        };
        let value = serde_json::to_value(&response).unwrap();
        assert!(value.get("currency").is_none());
        assert!(value.get("error").is_none());
        assert_eq!(value["available_to_capture"], "1.00");
    }

    #[test]
    fn test_error_and_currency_are_present_when_set() {
        let response = project_capture(&payment(9900, 0, 0), Some(Rejection::CaptureTooHigh));
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["currency"], "USD");
        assert_eq!(value["error"], "capture amount is higher than authorized");
    }
}
