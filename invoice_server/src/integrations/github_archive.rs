//! Archival sink backed by the GitHub contents API.
//!
//! Each invoice is committed as `{prefix}/{order_id}/{payment_id}.pdf` on the configured branch, so
//! re-verifying the same payment targets the same path. The contents API rejects a `PUT` to an
//! existing path unless the current blob sha is supplied, so the sink looks that sha up first and a
//! repeated verification overwrites the file instead of failing. The returned reference carries the
//! file URL and the commit sha that stored it.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use invoice_engine::{
    journal_types::{ArchiveReference, BillingFacts},
    traits::{ArchivalSink, SinkError},
};
use log::debug;
use reqwest::{header, Client, StatusCode};
use serde_json::{json, Value};

use crate::{
    config::ArchiveConfig,
    integrations::{reject_unsuccessful, send_with_retry, OUTBOUND_TIMEOUT},
};

#[derive(Clone)]
pub struct GithubArchive {
    config: ArchiveConfig,
    client: Client,
}

impl GithubArchive {
    pub fn new(config: ArchiveConfig) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .user_agent("invoice-fulfillment-gateway")
            .build()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn invoice_path(&self, facts: &BillingFacts, payment_id: &str) -> String {
        format!("{}/{}/{payment_id}.pdf", self.config.path_prefix, facts.order_id)
    }

    fn upload_body(&self, facts: &BillingFacts, payment_id: &str, pdf: &[u8], existing_sha: Option<String>) -> Value {
        let mut body = json!({
            "message": format!("Invoice for order {} (payment {payment_id})", facts.order_id),
            "content": BASE64.encode(pdf),
            "branch": self.config.branch,
        });
        if let Some(sha) = existing_sha {
            body["sha"] = json!(sha);
        }
        body
    }

    /// The blob sha of an already-archived invoice at this path, if one exists. 404 means a fresh
    /// upload; any other failure is treated the same and left for the `PUT` to report.
    async fn existing_file_sha(&self, url: &str) -> Option<String> {
        let request = self
            .client
            .get(url)
            .query(&[("ref", self.config.branch.as_str())])
            .bearer_auth(self.config.token.reveal())
            .header(header::ACCEPT, "application/vnd.github+json");
        match request.send().await {
            Ok(response) if response.status() == StatusCode::NOT_FOUND => None,
            Ok(response) if response.status().is_success() => {
                let payload = response.json::<Value>().await.ok()?;
                payload.get("sha").and_then(Value::as_str).map(str::to_string)
            },
            Ok(response) => {
                debug!("📤️ Could not check for an existing invoice at {url} ({}).", response.status());
                None
            },
            Err(e) => {
                debug!("📤️ Could not check for an existing invoice at {url}. {e}");
                None
            },
        }
    }
}

impl ArchivalSink for GithubArchive {
    async fn store_invoice(
        &self,
        facts: &BillingFacts,
        payment_id: &str,
        pdf: &[u8],
    ) -> Result<ArchiveReference, SinkError> {
        let path = self.invoice_path(facts, payment_id);
        let url = format!("{}/repos/{}/contents/{path}", self.config.api_url, self.config.repo);
        let existing_sha = self.existing_file_sha(&url).await;
        let body = self.upload_body(facts, payment_id, pdf, existing_sha);
        let request = self
            .client
            .put(&url)
            .bearer_auth(self.config.token.reveal())
            .header(header::ACCEPT, "application/vnd.github+json")
            .json(&body);
        let response = send_with_retry(request, "invoice archive upload").await?;
        let response = reject_unsuccessful(response, "invoice archive upload").await?;
        let payload: Value = response.json().await.map_err(|e| SinkError::Transport(e.to_string()))?;
        let location = payload
            .pointer("/content/html_url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(path);
        let revision = payload.pointer("/commit/sha").and_then(Value::as_str).map(str::to_string);
        Ok(ArchiveReference { location, revision })
    }
}
