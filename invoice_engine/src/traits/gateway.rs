use ifg_common::Paise;
use thiserror::Error;

use crate::journal_types::GatewayOrder;

#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("Could not reach the payment gateway. {0}")]
    Transport(String),
    #[error("The payment gateway rejected the request ({status}). {message}")]
    Remote { status: u16, message: String },
    #[error("Invalid gateway configuration. {0}")]
    Misconfigured(String),
}

/// Order creation with the external payment processor. A thin proxy: the gateway owns the order id
/// and remains the source of truth for payment state.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway {
    async fn create_order(&self, amount: Paise, receipt: &str) -> Result<GatewayOrder, GatewayError>;
}
