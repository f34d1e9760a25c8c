use ifg_common::Paise;
use invoice_engine::{
    journal_types::{ArchiveReference, CartItem, Customer, OrderId},
    FulfillmentReceipt,
    PaymentClaim,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// The order total in the currency's smallest unit (paise). Must be positive.
    #[serde(default)]
    pub amount: i64,
    #[serde(default)]
    pub receipt: Option<String>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
}

/// A client-submitted "payment succeeded" claim. Every field defaults so that missing values reach
/// the engine as empty strings and come back as a structured missing-fields rejection rather than a
/// bare deserialization error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub order_id: String,
    #[serde(default)]
    pub payment_id: String,
    #[serde(default)]
    pub signature: String,
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub customer: Option<Customer>,
    #[serde(default)]
    pub cart: Option<Vec<CartItem>>,
}

impl VerifyRequest {
    pub fn into_claim(self) -> PaymentClaim {
        PaymentClaim {
            order_id: self.order_id,
            payment_id: self.payment_id,
            signature: self.signature,
            amount: self.amount.map(Paise::from),
            customer: self.customer,
            cart: self.cart,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub ok: bool,
    pub order_id: OrderId,
    pub payment_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Paise>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archive: Option<ArchiveReference>,
    pub email_attempted: bool,
    pub email_sent: bool,
}

impl From<FulfillmentReceipt> for VerifyResponse {
    fn from(receipt: FulfillmentReceipt) -> Self {
        Self {
            ok: true,
            order_id: receipt.order_id,
            payment_id: receipt.payment_id,
            amount: receipt.amount,
            archive: receipt.archive,
            email_attempted: receipt.email_attempted,
            email_sent: receipt.email_sent,
        }
    }
}
