//! Notification sink backed by a transactional email HTTP API (Resend-style `POST /emails`).

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use invoice_engine::{
    journal_types::BillingFacts,
    traits::{NotificationSink, SinkError},
};
use reqwest::Client;
use serde_json::json;

use crate::{
    config::EmailConfig,
    integrations::{reject_unsuccessful, send_with_retry, OUTBOUND_TIMEOUT},
};

#[derive(Clone)]
pub struct TransactionalMailer {
    config: EmailConfig,
    client: Client,
}

impl TransactionalMailer {
    pub fn new(config: EmailConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }
}

impl NotificationSink for TransactionalMailer {
    async fn send_invoice(&self, facts: &BillingFacts, recipient: &str, pdf: &[u8]) -> Result<(), SinkError> {
        let url = format!("{}/emails", self.config.api_url);
        let name = facts.customer.name.as_deref().unwrap_or("there");
        let total = facts.total();
        let mut body = json!({
            "from": self.config.sender,
            "to": [recipient],
            "subject": format!("Your invoice for order {}", facts.order_id),
            "html": format!(
                "<p>Hi {name},</p><p>Thank you for your payment of {total}. Your invoice is attached.</p>"
            ),
            "attachments": [{
                "filename": format!("invoice-{}.pdf", facts.order_id),
                "content": BASE64.encode(pdf),
            }],
        });
        if let Some(bcc) = &self.config.bcc {
            body["bcc"] = json!([bcc]);
        }
        let request = self.client.post(&url).bearer_auth(self.config.api_key.reveal()).json(&body);
        let response = send_with_retry(request, "invoice email").await?;
        reject_unsuccessful(response, "invoice email").await?;
        Ok(())
    }
}
