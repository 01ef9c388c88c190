//! Card payments through a hosted payment provider.
//!
//! - [`PaymentGateway`] -- provider seam (create / retrieve payment intents).
//! - [`stripe::StripeGateway`] -- the Stripe REST implementation.
//! - [`verifier::PaymentVerifier`] -- checks the payment proof sent with a booking.
//! - [`amount`] -- server-side amount of a payment request.

pub mod amount;
pub mod stripe;
pub mod verifier;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::Deserialize;

pub use verifier::PaymentVerifier;

/// Provider status of a settled payment.
pub const STATUS_SUCCEEDED: &str = "succeeded";

/// Payment provider configuration.
#[derive(Debug, Clone)]
pub struct PaymentConfig {
    pub secret_key: String,
    /// Publishable key handed to the browser widget.
    pub public_key: String,
    pub api_base: String,
    /// Accept `test_`-prefixed payment ids without calling the provider.
    pub allow_fake_payments: bool,
    pub currency: String,
}

impl PaymentConfig {
    /// Load payment configuration from environment variables.
    ///
    /// | Env Var               | Default                  |
    /// |-----------------------|--------------------------|
    /// | `STRIPE_SECRET_KEY`   | empty                    |
    /// | `STRIPE_PUBLIC_KEY`   | empty                    |
    /// | `STRIPE_API_BASE`     | `https://api.stripe.com` |
    /// | `ALLOW_FAKE_PAYMENTS` | `false`                  |
    /// | `PAYMENT_CURRENCY`    | `eur`                    |
    pub fn from_env() -> Self {
        let allow_fake_payments: bool = std::env::var("ALLOW_FAKE_PAYMENTS")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("ALLOW_FAKE_PAYMENTS must be true or false");

        Self {
            secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
            public_key: std::env::var("STRIPE_PUBLIC_KEY").unwrap_or_default(),
            api_base: std::env::var("STRIPE_API_BASE")
                .unwrap_or_else(|_| "https://api.stripe.com".into()),
            allow_fake_payments,
            currency: std::env::var("PAYMENT_CURRENCY").unwrap_or_else(|_| "eur".into()),
        }
    }
}

/// Payment intent as returned by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub client_secret: Option<String>,
}

/// Parameters for creating a payment intent.
#[derive(Debug, Clone, Default)]
pub struct NewPaymentIntent {
    pub amount_cents: i64,
    pub currency: String,
    pub description: Option<String>,
    pub metadata: BTreeMap<String, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PaymentError {
    #[error("Erreur réseau: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider answered with an error body.
    #[error("{message}")]
    Provider { status: u16, message: String },

    #[error("Paiement non configuré")]
    NotConfigured,
}

/// Seam over the payment provider, so tests can substitute a fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(&self, intent: &NewPaymentIntent) -> Result<PaymentIntent, PaymentError>;

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError>;
}
