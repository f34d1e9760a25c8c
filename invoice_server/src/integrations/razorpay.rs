//! Razorpay Orders API client.
//!
//! A thin proxy: the gateway assigns the order id and remains the source of truth for payment
//! state. Only order creation is needed here; payment capture happens on the client side and is
//! reported back through `/verify` or the webhook.

use ifg_common::{Paise, INR_CURRENCY_CODE};
use invoice_engine::{
    journal_types::GatewayOrder,
    traits::{GatewayError, PaymentGateway},
};
use log::debug;
use reqwest::Client;
use serde_json::json;

use crate::{config::GatewayConfig, integrations::OUTBOUND_TIMEOUT};

#[derive(Clone)]
pub struct RazorpayApi {
    config: GatewayConfig,
    client: Client,
}

impl RazorpayApi {
    pub fn new(config: GatewayConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

impl PaymentGateway for RazorpayApi {
    async fn create_order(&self, amount: Paise, receipt: &str) -> Result<GatewayOrder, GatewayError> {
        if self.config.key_id.is_empty() || self.config.key_secret.is_empty() {
            return Err(GatewayError::Misconfigured("Razorpay API keys are not set".to_string()));
        }
        let url = format!("{}/v1/orders", self.config.api_url);
        let body = json!({
            "amount": amount.value(),
            "currency": INR_CURRENCY_CODE,
            "receipt": receipt,
        });
        debug!("💳️ Creating gateway order for {amount} (receipt {receipt}).");
        let response = self
            .client
            .post(&url)
            .basic_auth(&self.config.key_id, Some(self.config.key_secret.reveal()))
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(GatewayError::Remote { status: status.as_u16(), message });
        }
        response
            .json::<GatewayOrder>()
            .await
            .map_err(|e| GatewayError::Transport(format!("Could not parse the gateway order response: {e}")))
    }
}
