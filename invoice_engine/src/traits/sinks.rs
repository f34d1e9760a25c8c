use thiserror::Error;

use crate::journal_types::{ArchiveReference, BillingFacts};

#[derive(Debug, Clone, Error)]
pub enum SinkError {
    #[error("Transport failure. {0}")]
    Transport(String),
    #[error("The remote service rejected the request ({status}). {message}")]
    Remote { status: u16, message: String },
}

/// Stores a rendered invoice in a durable remote location and returns a retrievable reference.
///
/// Implementations should bound their own outbound calls (timeout plus a small retry for transient
/// failures); the orchestrator treats any error as "skip archival", never as a request failure.
#[allow(async_fn_in_trait)]
pub trait ArchivalSink {
    async fn store_invoice(
        &self,
        facts: &BillingFacts,
        payment_id: &str,
        pdf: &[u8],
    ) -> Result<ArchiveReference, SinkError>;
}

/// Delivers the invoice to the customer. Same containment policy as [`ArchivalSink`]: errors are
/// logged by the orchestrator and never surface to the verification caller.
#[allow(async_fn_in_trait)]
pub trait NotificationSink {
    async fn send_invoice(&self, facts: &BillingFacts, recipient: &str, pdf: &[u8]) -> Result<(), SinkError>;
}
