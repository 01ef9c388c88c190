//! Stripe REST gateway (`/v1/payment_intents`).

use async_trait::async_trait;
use serde::Deserialize;

use super::{NewPaymentIntent, PaymentConfig, PaymentError, PaymentGateway, PaymentIntent};

/// Calls the Stripe REST API with the secret key.
pub struct StripeGateway {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

#[derive(Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl StripeGateway {
    pub fn new(config: &PaymentConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            secret_key: config.secret_key.clone(),
        }
    }

    fn ensure_configured(&self) -> Result<(), PaymentError> {
        if self.secret_key.is_empty() {
            return Err(PaymentError::NotConfigured);
        }
        Ok(())
    }

    async fn parse(response: reqwest::Response) -> Result<PaymentIntent, PaymentError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<PaymentIntent>().await?);
        }
        let message = response
            .json::<StripeErrorBody>()
            .await
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| format!("Erreur du fournisseur de paiement ({status})"));
        Err(PaymentError::Provider {
            status: status.as_u16(),
            message,
        })
    }
}

/// Form fields for `POST /v1/payment_intents`.
fn intent_form(intent: &NewPaymentIntent) -> Vec<(String, String)> {
    let mut form = vec![
        ("amount".to_string(), intent.amount_cents.to_string()),
        ("currency".to_string(), intent.currency.clone()),
        (
            "automatic_payment_methods[enabled]".to_string(),
            "true".to_string(),
        ),
    ];
    if let Some(description) = &intent.description {
        form.push(("description".to_string(), description.clone()));
    }
    for (key, value) in &intent.metadata {
        form.push((format!("metadata[{key}]"), value.clone()));
    }
    form
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    async fn create_intent(&self, intent: &NewPaymentIntent) -> Result<PaymentIntent, PaymentError> {
        self.ensure_configured()?;
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&intent_form(intent))
            .send()
            .await?;
        Self::parse(response).await
    }

    async fn retrieve_intent(&self, id: &str) -> Result<PaymentIntent, PaymentError> {
        self.ensure_configured()?;
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{id}", self.api_base))
            .bearer_auth(&self.secret_key)
            .send()
            .await?;
        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_form_encodes_metadata_keys() {
        let mut metadata = BTreeMap::new();
        metadata.insert("reservationType".to_string(), "EVENT".to_string());
        metadata.insert("eventId".to_string(), "7".to_string());

        let form = intent_form(&NewPaymentIntent {
            amount_cents: 2500,
            currency: "eur".to_string(),
            description: Some("Inscription".to_string()),
            metadata,
        });

        assert!(form.contains(&("amount".to_string(), "2500".to_string())));
        assert!(form.contains(&("metadata[eventId]".to_string(), "7".to_string())));
        assert!(form.contains(&("metadata[reservationType]".to_string(), "EVENT".to_string())));
        assert!(form.contains(&("description".to_string(), "Inscription".to_string())));
    }

    #[tokio::test]
    async fn test_missing_secret_key_is_reported() {
        let gateway = StripeGateway::new(&PaymentConfig {
            secret_key: String::new(),
            public_key: String::new(),
            api_base: "http://127.0.0.1:9".to_string(),
            allow_fake_payments: false,
            currency: "eur".to_string(),
        });
        let result = gateway.retrieve_intent("pi_123").await;
        assert!(matches!(result, Err(PaymentError::NotConfigured)));
    }
}
