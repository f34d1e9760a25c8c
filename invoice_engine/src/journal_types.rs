use std::fmt::Display;

use chrono::{DateTime, Utc};
use ifg_common::{Paise, INR_CURRENCY_CODE};
use serde::{Deserialize, Serialize};

/// Contact and address fields may be anything the storefront sends us. We don't validate them, but we
/// do cap their length before they hit the journal.
pub const MAX_FIELD_LEN: usize = 256;

//--------------------------------------      OrderId        ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl OrderId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for OrderId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for OrderId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

//--------------------------------------      Customer       ---------------------------------------------------------
/// Customer contact details as supplied at order creation. All fields are optional free text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
}

impl Customer {
    /// Truncate every field to [`MAX_FIELD_LEN`] characters. The only validation we do.
    pub fn sanitized(mut self) -> Self {
        for field in [
            &mut self.name,
            &mut self.email,
            &mut self.phone,
            &mut self.address_line1,
            &mut self.address_line2,
            &mut self.city,
            &mut self.state,
            &mut self.postal_code,
        ] {
            if let Some(value) = field {
                truncate_in_place(value, MAX_FIELD_LEN);
            }
        }
        self
    }
}

fn truncate_in_place(value: &mut String, max_chars: usize) {
    if let Some((idx, _)) = value.char_indices().nth(max_chars) {
        value.truncate(idx);
    }
}

//--------------------------------------      CartItem       ---------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub name: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: Paise,
}

fn default_quantity() -> u32 {
    1
}

impl CartItem {
    pub fn new<S: Into<String>>(name: S, quantity: u32, unit_price: Paise) -> Self {
        Self { name: name.into(), quantity, unit_price }.sanitized()
    }

    /// Clamp client-supplied values to the journal invariants: at least one unit, no negative
    /// prices, name capped like the customer fields. Deserialization is permissive; every record
    /// passes through here before it reaches the journal or an invoice.
    pub fn sanitized(mut self) -> Self {
        truncate_in_place(&mut self.name, MAX_FIELD_LEN);
        self.quantity = self.quantity.max(1);
        if self.unit_price < Paise::default() {
            self.unit_price = Paise::default();
        }
        self
    }

    pub fn line_total(&self) -> Paise {
        self.unit_price * i64::from(self.quantity)
    }
}

fn sanitize_cart(cart: Vec<CartItem>) -> Vec<CartItem> {
    cart.into_iter().map(CartItem::sanitized).collect()
}

//--------------------------------------     OrderRecord     ---------------------------------------------------------
/// One order as journalled at creation time. Append-only: a record is never updated in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub amount: Paise,
    pub currency: String,
    #[serde(default)]
    pub customer: Customer,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
}

impl OrderRecord {
    pub fn new(order_id: OrderId, amount: Paise, customer: Customer, cart: Vec<CartItem>) -> Self {
        Self {
            order_id,
            amount,
            currency: INR_CURRENCY_CODE.to_string(),
            customer: customer.sanitized(),
            cart: sanitize_cart(cart),
            created_at: Utc::now(),
        }
    }
}

//--------------------------------------  VerificationEvent  ---------------------------------------------------------
/// Ledger entry written after a payment signature checks out. Never rewritten; duplicates for the
/// same (order, payment) pair show up as repeated lines.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationEvent {
    pub order_id: OrderId,
    pub payment_id: String,
    pub verified_at: DateTime<Utc>,
}

impl VerificationEvent {
    pub fn now(order_id: OrderId, payment_id: String) -> Self {
        Self { order_id, payment_id, verified_at: Utc::now() }
    }
}

//--------------------------------------    BillingFacts     ---------------------------------------------------------
/// The resolved inputs for rendering an invoice. Usually reconstructed from the journal; when the
/// order is unknown, built from whatever the verification request supplied (the degraded path).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingFacts {
    pub order_id: OrderId,
    pub amount: Option<Paise>,
    pub currency: String,
    pub customer: Customer,
    pub cart: Vec<CartItem>,
}

impl BillingFacts {
    pub fn from_record(record: &OrderRecord) -> Self {
        Self {
            order_id: record.order_id.clone(),
            amount: Some(record.amount),
            currency: record.currency.clone(),
            customer: record.customer.clone(),
            cart: record.cart.clone(),
        }
    }

    pub fn degraded(
        order_id: OrderId,
        amount: Option<Paise>,
        customer: Option<Customer>,
        cart: Option<Vec<CartItem>>,
    ) -> Self {
        Self {
            order_id,
            amount,
            currency: INR_CURRENCY_CODE.to_string(),
            customer: customer.unwrap_or_default().sanitized(),
            cart: sanitize_cart(cart.unwrap_or_default()),
        }
    }

    /// The amount to show on the invoice: the journalled amount if we have one, otherwise the sum of
    /// the cart line items.
    pub fn total(&self) -> Paise {
        self.amount.unwrap_or_else(|| self.cart.iter().map(CartItem::line_total).sum())
    }
}

//--------------------------------------  ArchiveReference   ---------------------------------------------------------
/// The durable reference returned by an archival sink: where the invoice ended up, and the revision
/// (commit id, version id) that stored it, if the backend has one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveReference {
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
}

//--------------------------------------    GatewayOrder     ---------------------------------------------------------
/// The order object created by the external payment processor. Echoed back to the client verbatim;
/// the gateway remains the source of truth for payment state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: OrderId,
    pub amount: Paise,
    pub currency: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receipt: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn customer_fields_are_truncated() {
        let customer = Customer { name: Some("x".repeat(1000)), ..Customer::default() }.sanitized();
        assert_eq!(customer.name.unwrap().chars().count(), MAX_FIELD_LEN);
    }

    #[test]
    fn cart_item_defaults() {
        let item: CartItem = serde_json::from_str(r#"{"name": "T-shirt"}"#).unwrap();
        assert_eq!(item.quantity, 1);
        assert_eq!(item.unit_price, Paise::from(0));
        let item = CartItem::new("Mug", 0, Paise::from(100));
        assert_eq!(item.quantity, 1);
    }

    #[test]
    fn client_supplied_cart_values_are_clamped() {
        // Deserialization itself stays permissive; the constructors enforce the invariants.
        let item: CartItem = serde_json::from_str(r#"{"name":"Widget","quantity":0,"unitPrice":-500}"#).unwrap();
        assert_eq!(item.quantity, 0);
        assert_eq!(item.unit_price, Paise::from(-500));

        let record =
            OrderRecord::new(OrderId::from("order_1"), Paise::from(100), Customer::default(), vec![item.clone()]);
        assert_eq!(record.cart[0].quantity, 1);
        assert_eq!(record.cart[0].unit_price, Paise::from(0));

        let facts = BillingFacts::degraded(OrderId::from("order_1"), None, None, Some(vec![item]));
        assert_eq!(facts.cart[0].quantity, 1);
        assert_eq!(facts.cart[0].unit_price, Paise::from(0));
        assert_eq!(facts.total(), Paise::from(0));
    }

    #[test]
    fn oversized_line_totals_saturate() {
        let item = CartItem::new("Bulk", u32::MAX, Paise::from(i64::MAX));
        assert_eq!(item.line_total(), Paise::from(i64::MAX));
    }

    #[test]
    fn billing_facts_total_falls_back_to_cart() {
        let cart = vec![CartItem::new("A", 2, Paise::from(150)), CartItem::new("B", 1, Paise::from(200))];
        let facts = BillingFacts::degraded(OrderId::from("order_x"), None, None, Some(cart));
        assert_eq!(facts.total(), Paise::from(500));
        let facts = BillingFacts::degraded(OrderId::from("order_x"), Some(Paise::from(999)), None, None);
        assert_eq!(facts.total(), Paise::from(999));
    }

    #[test]
    fn order_record_round_trips_through_json() {
        let record = OrderRecord::new(
            OrderId::from("order_abc"),
            Paise::from(50_000),
            Customer { name: Some("Asha".into()), email: Some("asha@example.com".into()), ..Customer::default() },
            vec![CartItem::new("Widget", 2, Paise::from(25_000))],
        );
        let line = serde_json::to_string(&record).unwrap();
        let parsed: OrderRecord = serde_json::from_str(&line).unwrap();
        assert_eq!(parsed, record);
    }
}
