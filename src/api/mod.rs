//! HTTP request layer
//!
//! Builds the axum router and owns the per-request plumbing around the
//! core: payload validation (`requests`), authentication and ownership
//! guards (`guards`), balance projection (`responses`) and the operation
//! handlers (`handlers`). Engine work runs under a 3 second deadline;
//! cancellation is cooperative at the store await points.

use std::sync::Arc;
use std::time::Duration;

use axum::routing::post;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::core::{MerchantDirectory, PaymentEngine};
use crate::store::Store;

pub mod guards;
pub mod handlers;
pub mod requests;
pub mod responses;

/// Deadline for engine work within a single request.
pub const ENGINE_DEADLINE: Duration = Duration::from_secs(3);

/// Shared per-process state handed to every handler
///
/// Both components wrap the same store handle; there is no other shared
/// mutable state between requests.
#[derive(Clone)]
pub struct AppState {
    pub engine: PaymentEngine,
    pub merchants: MerchantDirectory,
}

impl AppState {
    /// Assemble the application state over one shared store
    pub fn new(store: Arc<dyn Store>) -> Self {
        AppState {
            engine: PaymentEngine::new(store.clone()),
            merchants: MerchantDirectory::new(store),
        }
    }
}

/// Build the gateway router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/merchant/register", post(handlers::register))
        .route("/merchant/{merchant_id}/authorize", post(handlers::authorize))
        .route(
            "/merchant/{merchant_id}/capture/{payment_id}",
            post(handlers::capture),
        )
        .route(
            "/merchant/{merchant_id}/refund/{payment_id}",
            post(handlers::refund),
        )
        .route(
            "/merchant/{merchant_id}/void/{payment_id}",
            post(handlers::void),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
