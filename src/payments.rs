//! Stripe passthrough. The backend only creates payment intents and
//! hands the client secret to the frontend; everything else happens
//! between the browser and the processor.
use serde::Deserialize;

use crate::error::AppError;

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Clone)]
pub struct PaymentsClient {
    http: reqwest::Client,
    secret_key: String,
}

#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

impl PaymentsClient {
    pub fn new(secret_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key,
        }
    }

    /// Creates a USD card payment intent for `amount` (smallest
    /// currency unit, as Stripe expects).
    pub async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, AppError> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", "usd".to_string()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .http
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}
