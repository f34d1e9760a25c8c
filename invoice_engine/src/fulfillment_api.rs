//! The verification and fulfillment orchestrator.
//!
//! [`FulfillmentApi`] drives one verification request from claim to receipt:
//! verify the signature, ledger the verification, resolve billing facts, render the invoice, then
//! fan out to the archival and notification sinks. The fan-out is strictly best-effort: a payment
//! that has already been verified as legitimate is never reported as failed because a downstream
//! convenience action (archiving, emailing) fell over. Rendering is the one downstream step whose
//! failure is fatal, because without an artifact there is nothing left to do.

use std::fmt::Debug;

use ifg_common::{Paise, Secret};
use log::*;
use thiserror::Error;

use crate::{
    helpers::{verify_payment_signature, SignatureError},
    journal_types::{ArchiveReference, BillingFacts, CartItem, Customer, OrderId, OrderRecord, VerificationEvent},
    traits::{ArchivalSink, InvoiceRenderer, NotificationSink, OrderJournal},
};

/// An unauthenticated "payment succeeded" claim, as submitted by the client after checkout or
/// extracted from a gateway webhook event.
#[derive(Debug, Clone, Default)]
pub struct PaymentClaim {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
    /// Only consulted on the degraded path, when the order is not in the journal.
    pub amount: Option<Paise>,
    pub customer: Option<Customer>,
    pub cart: Option<Vec<CartItem>>,
}

/// What one fulfillment run achieved. `archive`/`email_sent` report best-effort outcomes; the
/// request as a whole succeeded once this struct exists.
#[derive(Debug, Clone)]
pub struct FulfillmentReceipt {
    pub order_id: OrderId,
    pub payment_id: String,
    pub amount: Option<Paise>,
    pub archive: Option<ArchiveReference>,
    pub email_attempted: bool,
    pub email_sent: bool,
}

#[derive(Debug, Clone, Error)]
pub enum FulfillmentError {
    #[error("Missing required fields: {0}")]
    MissingFields(String),
    #[error("Invalid signature")]
    InvalidSignature,
    #[error("Invalid gateway configuration. {0}")]
    Misconfigured(String),
    #[error("Could not render the invoice. {0}")]
    RenderFailed(String),
}

/// `FulfillmentApi` is the primary API for handling payment-verification claims and driving invoice
/// fulfillment. The archival and notification sinks are optional; `None` means the deployment has
/// not configured that sink and it is skipped without being attempted.
pub struct FulfillmentApi<J, R, A, N> {
    journal: J,
    renderer: R,
    archive: Option<A>,
    notifier: Option<N>,
    gateway_secret: Secret<String>,
}

impl<J, R, A, N> Debug for FulfillmentApi<J, R, A, N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FulfillmentApi")
    }
}

impl<J, R, A, N> FulfillmentApi<J, R, A, N> {
    pub fn new(
        journal: J,
        renderer: R,
        archive: Option<A>,
        notifier: Option<N>,
        gateway_secret: Secret<String>,
    ) -> Self {
        Self { journal, renderer, archive, notifier, gateway_secret }
    }
}

impl<J, R, A, N> FulfillmentApi<J, R, A, N>
where
    J: OrderJournal,
    R: InvoiceRenderer,
    A: ArchivalSink,
    N: NotificationSink,
{
    /// Handle a client-submitted claim: check the signature, then run the fulfillment flow.
    ///
    /// A repeated claim for the same `(order_id, payment_id)` pair re-runs fulfillment in full
    /// (re-render, re-upload, re-send). The verification ledger records every run.
    pub async fn fulfill(&self, claim: PaymentClaim) -> Result<FulfillmentReceipt, FulfillmentError> {
        let mut missing = Vec::new();
        if claim.order_id.is_empty() {
            missing.push("orderId");
        }
        if claim.payment_id.is_empty() {
            missing.push("paymentId");
        }
        if claim.signature.is_empty() {
            missing.push("signature");
        }
        if !missing.is_empty() {
            return Err(FulfillmentError::MissingFields(missing.join(", ")));
        }
        match verify_payment_signature(&claim.order_id, &claim.payment_id, &claim.signature, &self.gateway_secret) {
            Err(SignatureError::MissingSecret) => {
                error!("🧾️ A verification claim arrived but no gateway secret is configured. Rejecting.");
                return Err(FulfillmentError::Misconfigured("No gateway secret is set".to_string()));
            },
            Ok(false) => {
                warn!("🧾️ Invalid signature on claim for order {} / payment {}.", claim.order_id, claim.payment_id);
                return Err(FulfillmentError::InvalidSignature);
            },
            Ok(true) => {
                trace!("🧾️ Signature on claim for order {} checks out.", claim.order_id);
            },
        }
        self.fulfill_verified(claim).await
    }

    /// Run the fulfillment flow for a claim whose authenticity has already been established (for
    /// example, a webhook body whose raw-byte HMAC was verified upstream).
    pub async fn fulfill_verified(&self, claim: PaymentClaim) -> Result<FulfillmentReceipt, FulfillmentError> {
        let order_id = OrderId::from(claim.order_id.clone());
        let event = VerificationEvent::now(order_id.clone(), claim.payment_id.clone());
        if let Err(e) = self.journal.record_verification(event).await {
            // Ledger write is best-effort; the gateway remains the source of truth for the payment.
            warn!("🧾️ Could not record verification event for order {order_id}. {e}");
        }

        let facts = match self.journal.lookup(&order_id).await {
            Some(record) => BillingFacts::from_record(&record),
            None => {
                info!("🧾️ Order {order_id} is not in the journal. Falling back to claim-supplied billing facts.");
                BillingFacts::degraded(order_id.clone(), claim.amount, claim.customer, claim.cart)
            },
        };

        let pdf = self.renderer.render(&facts).await.map_err(|e| {
            error!("🧾️ Could not render invoice for order {order_id}. {e}");
            FulfillmentError::RenderFailed(e.to_string())
        })?;
        debug!("🧾️ Rendered invoice for order {order_id} ({} bytes).", pdf.len());

        let archive = self.archive_invoice(&facts, &claim.payment_id, &pdf).await;
        let (email_attempted, email_sent) = self.notify_customer(&facts, &pdf).await;

        Ok(FulfillmentReceipt {
            order_id,
            payment_id: claim.payment_id,
            amount: facts.amount,
            archive,
            email_attempted,
            email_sent,
        })
    }

    /// Journal a freshly created order. Best-effort: a journal write failure is logged and swallowed,
    /// since the gateway order exists either way.
    pub async fn register_order(&self, record: OrderRecord) {
        let order_id = record.order_id.clone();
        match self.journal.append(record).await {
            Ok(()) => debug!("🧾️ Order {order_id} journalled."),
            Err(e) => warn!("🧾️ Could not journal order {order_id}. The gateway order still exists. {e}"),
        }
    }

    async fn archive_invoice(
        &self,
        facts: &BillingFacts,
        payment_id: &str,
        pdf: &[u8],
    ) -> Option<ArchiveReference> {
        let sink = match &self.archive {
            Some(sink) => sink,
            None => {
                debug!("🧾️ No archival sink is configured. Skipping invoice upload for order {}.", facts.order_id);
                return None;
            },
        };
        match sink.store_invoice(facts, payment_id, pdf).await {
            Ok(reference) => {
                info!("🧾️ Invoice for order {} archived at {}.", facts.order_id, reference.location);
                Some(reference)
            },
            Err(e) => {
                warn!("🧾️ Could not archive invoice for order {}. The payment stays verified. {e}", facts.order_id);
                None
            },
        }
    }

    async fn notify_customer(&self, facts: &BillingFacts, pdf: &[u8]) -> (bool, bool) {
        let sink = match &self.notifier {
            Some(sink) => sink,
            None => {
                debug!("🧾️ No notification sink is configured. Skipping email for order {}.", facts.order_id);
                return (false, false);
            },
        };
        let recipient = match facts.customer.email.as_deref().filter(|s| !s.is_empty()) {
            Some(recipient) => recipient,
            None => {
                debug!("🧾️ Order {} has no customer email. Skipping notification.", facts.order_id);
                return (false, false);
            },
        };
        match sink.send_invoice(facts, recipient, pdf).await {
            Ok(()) => {
                info!("🧾️ Invoice for order {} emailed to the customer.", facts.order_id);
                (true, true)
            },
            Err(e) => {
                warn!("🧾️ Could not email invoice for order {}. The payment stays verified. {e}", facts.order_id);
                (true, false)
            },
        }
    }
}
