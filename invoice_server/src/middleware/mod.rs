mod hmac;

pub use hmac::HmacMiddlewareFactory;

/// Header the payment gateway uses to carry the webhook body signature.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "X-Razorpay-Signature";
