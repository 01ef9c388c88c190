//! Payment intents (`/payments`).
//!
//! The amount charged is always computed on the server; the client's own
//! figure is only compared against it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::payments::amount::{server_amount, PaymentRequest};
use crate::payments::{NewPaymentIntent, STATUS_SUCCEEDED};
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: Option<String>,
    pub public_key: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub status: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// POST /api/payments/create-payment-intent
///
/// Create an intent for the server-side amount of the request. A client
/// amount that differs is refused.
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(input): Json<PaymentRequest>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let target = input.target()?;
    let amount_cents = server_amount(&state.pool, &target).await?;

    if input.amount.is_some_and(|amount| amount != amount_cents) {
        tracing::info!(?target, client_amount = ?input.amount, amount_cents, "Payment amount mismatch");
        return Err(AppError::validation("Montant invalide"));
    }

    let intent = state
        .payments
        .gateway()
        .create_intent(&NewPaymentIntent {
            amount_cents,
            currency: input
                .currency
                .clone()
                .unwrap_or_else(|| state.config.payments.currency.clone()),
            description: input.description.clone(),
            metadata: input.metadata(),
        })
        .await
        .map_err(|e| {
            tracing::warn!(error = %e, "Payment intent creation failed");
            AppError::validation(e.to_string())
        })?;

    tracing::info!(payment_intent_id = %intent.id, amount_cents, "Payment intent created");
    Ok(Json(PaymentIntentResponse {
        client_secret: intent.client_secret,
        public_key: state.config.payments.public_key.clone(),
    }))
}

/// GET /api/payments/verify/{paymentIntentId}
///
/// Runs the same check as bookings do. A failed check answers 400 with
/// `status: "failed"` and the reason.
pub async fn verify_payment(
    State(state): State<AppState>,
    Path(payment_intent_id): Path<String>,
) -> Response {
    match state.payments.verify(Some(&payment_intent_id)).await {
        Ok(()) => Json(VerifyPaymentResponse {
            status: STATUS_SUCCEEDED.to_string(),
            success: true,
            payment_intent_id: Some(payment_intent_id),
            error: None,
        })
        .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(VerifyPaymentResponse {
                status: "failed".to_string(),
                success: false,
                payment_intent_id: Some(payment_intent_id),
                error: Some(e.to_string()),
            }),
        )
            .into_response(),
    }
}
