mod payment_signature;

pub use payment_signature::{calculate_hmac, verify_payment_signature, SignatureError};
