//! Payment proof checks for bookings.

use std::sync::Arc;

use cercle_core::error::CoreError;

use super::{PaymentGateway, STATUS_SUCCEEDED};

/// Prefix of fake payment ids accepted when fake payments are enabled.
pub const FAKE_PAYMENT_PREFIX: &str = "test_";

/// Checks that a booking carries a settled payment.
pub struct PaymentVerifier {
    gateway: Arc<dyn PaymentGateway>,
    allow_fake_payments: bool,
}

impl PaymentVerifier {
    pub fn new(gateway: Arc<dyn PaymentGateway>, allow_fake_payments: bool) -> Self {
        Self {
            gateway,
            allow_fake_payments,
        }
    }

    pub fn gateway(&self) -> &dyn PaymentGateway {
        self.gateway.as_ref()
    }

    /// Verify the payment intent sent with a booking.
    ///
    /// A blank id is rejected, a `test_` id passes when fake payments are
    /// allowed, anything else must be `succeeded` at the provider.
    pub async fn verify(&self, payment_intent_id: Option<&str>) -> Result<(), CoreError> {
        let id = payment_intent_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| CoreError::validation("Paiement manquant"))?;

        if self.allow_fake_payments && id.starts_with(FAKE_PAYMENT_PREFIX) {
            tracing::debug!(payment_intent_id = id, "Accepting fake payment");
            return Ok(());
        }

        let intent = self.gateway.retrieve_intent(id).await.map_err(|e| {
            tracing::warn!(payment_intent_id = id, error = %e, "Payment verification failed");
            CoreError::validation(format!("Erreur vérification paiement: {e}"))
        })?;

        if intent.status != STATUS_SUCCEEDED {
            tracing::info!(payment_intent_id = id, status = %intent.status, "Payment not settled");
            return Err(CoreError::validation("Paiement non validé"));
        }
        Ok(())
    }
}
