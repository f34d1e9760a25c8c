use thiserror::Error;

use crate::journal_types::BillingFacts;

#[derive(Debug, Clone, Error)]
#[error("Could not render the invoice. {0}")]
pub struct RenderError(pub String);

impl From<String> for RenderError {
    fn from(e: String) -> Self {
        Self(e)
    }
}

/// Billing facts in, PDF bytes out. Layout and typography are the implementation's business; the
/// engine only requires that the same facts always produce the same bytes.
#[allow(async_fn_in_trait)]
pub trait InvoiceRenderer {
    async fn render(&self, facts: &BillingFacts) -> Result<Vec<u8>, RenderError>;
}
