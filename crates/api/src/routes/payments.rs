//! Route definitions for the `/payments` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::payment;
use crate::state::AppState;

/// Routes mounted at `/payments`. Both are public.
///
/// ```text
/// POST /create-payment-intent        -> create_payment_intent
/// GET  /verify/{paymentIntentId}     -> verify_payment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/create-payment-intent", post(payment::create_payment_intent))
        .route("/verify/{payment_intent_id}", get(payment::verify_payment))
}
