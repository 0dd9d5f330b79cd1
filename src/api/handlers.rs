//! HTTP handlers for the gateway operations
//!
//! Each handler runs the same sequence: payload parse, structural
//! validation, authentication, ownership (where applicable), then the
//! engine call under the request deadline, and finally response
//! projection. Authorize echoes detailed parse/validation messages;
//! capture and refund answer payload problems with a constant
//! `Bad Request` body.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use tokio::time::timeout;
use tracing::{debug, error, instrument};

use super::guards;
use super::requests::{AmountRequest, AuthorizeRequest};
use super::responses::{
    error_response, internal_error, project_capture, project_refund, project_void,
    AuthorizeResponse, RegisterResponse, BAD_REQUEST,
};
use super::{AppState, ENGINE_DEADLINE};
use crate::types::money::parse_minor_units;
use crate::types::{EngineError, FailureTrigger};

/// POST /merchant/register
#[instrument(skip_all, fields(request_id = %xid::new()))]
pub async fn register(State(state): State<AppState>) -> Response {
    match timeout(ENGINE_DEADLINE, state.merchants.register()).await {
        Ok(Ok((merchant_id, secret_key))) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                merchant_id,
                secret_key,
            }),
        )
            .into_response(),
        Ok(Err(e)) => {
            error!(error = %e, "merchant registration failed");
            internal_error()
        }
        Err(_) => {
            error!("merchant registration timed out");
            internal_error()
        }
    }
}

/// POST /merchant/{merchant_id}/authorize
#[instrument(skip_all, fields(request_id = %xid::new(), merchant_id = %merchant_id))]
pub async fn authorize(
    State(state): State<AppState>,
    Path(merchant_id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(response) = guards::check_path_id(&merchant_id) {
        return response;
    }

    let request: AuthorizeRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "authorization payload did not parse");
            return error_response(StatusCode::BAD_REQUEST, &e.to_string());
        }
    };
    if let Err(message) = request.validate() {
        debug!(%message, "authorization payload failed validation");
        return error_response(StatusCode::BAD_REQUEST, &message);
    }

    if let Err(response) = guards::authenticate(&state, &merchant_id, &headers).await {
        return response;
    }

    let Some(amount) = parse_minor_units(&request.amount) else {
        return error_response(StatusCode::BAD_REQUEST, "amount: regular expression mismatch");
    };
    let failure = FailureTrigger::for_card(&request.card_number);

    let result = timeout(
        ENGINE_DEADLINE,
        state
            .engine
            .authorize(amount, &request.currency, &merchant_id, failure),
    )
    .await;

    match result {
        Ok(Ok(payment_id)) => (
            StatusCode::OK,
            Json(AuthorizeResponse {
                payment_id,
                // The canonical request amount is echoed back untouched
                available_to_capture: request.amount.clone(),
                available_to_refund: "0.00".to_string(),
                currency: request.currency.clone(),
            }),
        )
            .into_response(),
        Ok(Err(EngineError::Declined(reason))) => {
            debug!(%reason, "authorization declined");
            error_response(StatusCode::BAD_REQUEST, &reason.to_string())
        }
        Ok(Err(e)) => {
            error!(error = %e, "authorization failed internally");
            internal_error()
        }
        Err(_) => {
            error!("authorization timed out");
            internal_error()
        }
    }
}

/// POST /merchant/{merchant_id}/capture/{payment_id}
#[instrument(skip_all, fields(
    request_id = %xid::new(),
    merchant_id = %path.0,
    payment_id = %path.1,
))]
pub async fn capture(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (merchant_id, payment_id) = path;
    transaction(&state, &merchant_id, &payment_id, &headers, &body, Operation::Capture).await
}

/// POST /merchant/{merchant_id}/refund/{payment_id}
#[instrument(skip_all, fields(
    request_id = %xid::new(),
    merchant_id = %path.0,
    payment_id = %path.1,
))]
pub async fn refund(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let (merchant_id, payment_id) = path;
    transaction(&state, &merchant_id, &payment_id, &headers, &body, Operation::Refund).await
}

/// POST /merchant/{merchant_id}/void/{payment_id}
#[instrument(skip_all, fields(
    request_id = %xid::new(),
    merchant_id = %path.0,
    payment_id = %path.1,
))]
pub async fn void(
    State(state): State<AppState>,
    Path(path): Path<(String, String)>,
    headers: HeaderMap,
) -> Response {
    let (merchant_id, payment_id) = path;

    if let Err(response) = guards::check_path_id(&merchant_id)
        .and_then(|()| guards::check_path_id(&payment_id))
    {
        return response;
    }
    if let Err(response) = guards::authenticate(&state, &merchant_id, &headers).await {
        return response;
    }
    if let Err(response) = guards::check_ownership(&state, &merchant_id, &payment_id).await {
        return response;
    }

    match timeout(ENGINE_DEADLINE, state.engine.void(&payment_id)).await {
        Ok(Ok(payment)) => {
            (StatusCode::OK, Json(project_void(&payment, None))).into_response()
        }
        Ok(Err(EngineError::Rejected { reason, payment })) => {
            debug!(%reason, "void rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(project_void(&payment, Some(reason))),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "void failed internally");
            internal_error()
        }
        Err(_) => {
            error!("void timed out");
            internal_error()
        }
    }
}

/// Which amount-carrying transaction a request drives.
enum Operation {
    Capture,
    Refund,
}

/// Shared flow for capture and refund
///
/// The two operations differ only in the engine call and the projector;
/// payload handling and the guard sequence are identical.
async fn transaction(
    state: &AppState,
    merchant_id: &str,
    payment_id: &str,
    headers: &HeaderMap,
    body: &Bytes,
    operation: Operation,
) -> Response {
    if let Err(response) =
        guards::check_path_id(merchant_id).and_then(|()| guards::check_path_id(payment_id))
    {
        return response;
    }

    let request: AmountRequest = match serde_json::from_slice(body) {
        Ok(request) => request,
        Err(e) => {
            debug!(error = %e, "transaction payload did not parse");
            return error_response(StatusCode::BAD_REQUEST, BAD_REQUEST);
        }
    };
    if let Err(message) = request.validate() {
        debug!(%message, "transaction payload failed validation");
        return error_response(StatusCode::BAD_REQUEST, BAD_REQUEST);
    }

    if let Err(response) = guards::authenticate(state, merchant_id, headers).await {
        return response;
    }
    if let Err(response) = guards::check_ownership(state, merchant_id, payment_id).await {
        return response;
    }

    let Some(amount) = parse_minor_units(&request.amount) else {
        return error_response(StatusCode::BAD_REQUEST, BAD_REQUEST);
    };

    let result = match operation {
        Operation::Capture => {
            timeout(ENGINE_DEADLINE, state.engine.capture(payment_id, amount)).await
        }
        Operation::Refund => {
            timeout(ENGINE_DEADLINE, state.engine.refund(payment_id, amount)).await
        }
    };
    let project = match operation {
        Operation::Capture => project_capture,
        Operation::Refund => project_refund,
    };

    match result {
        Ok(Ok(payment)) => (StatusCode::OK, Json(project(&payment, None))).into_response(),
        Ok(Err(EngineError::Rejected { reason, payment })) => {
            debug!(%reason, "transaction rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(project(&payment, Some(reason))),
            )
                .into_response()
        }
        Ok(Err(e)) => {
            error!(error = %e, "transaction failed internally");
            internal_error()
        }
        Err(_) => {
            error!("transaction timed out");
            internal_error()
        }
    }
}
