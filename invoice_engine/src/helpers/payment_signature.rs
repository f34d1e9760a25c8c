//! # Payment signature format
//!
//! When the payment gateway reports a successful capture, the client (or the gateway's webhook) hands
//! us an unauthenticated claim of "payment succeeded". The claim carries a signature so that we can
//! check it really came from the gateway:
//!
//! ```text
//!     signature = hex( HMAC-SHA256( secret, "{order_id}|{payment_id}" ) )
//! ```
//!
//! where `secret` is the shared key issued by the gateway. The webhook variant signs the raw request
//! body bytes instead of the id pair, with the same construction; re-serializing the JSON would alter
//! the byte layout, so the body must be verified before it is parsed.
//!
//! An absent secret is a configuration error. It must surface to the caller; it can never mean
//! "verification succeeded".

use hmac::{Hmac, Mac};
use ifg_common::Secret;
use sha2::Sha256;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, Error)]
pub enum SignatureError {
    #[error("No signing secret has been configured")]
    MissingSecret,
}

/// The hex-encoded HMAC-SHA256 of `data` under `secret`.
pub fn calculate_hmac(secret: &str, data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts keys of any length");
    mac.update(data);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a payment claim's signature. Returns `Ok(true)` iff `signature` equals the hex HMAC digest
/// of `"{order_id}|{payment_id}"`. No side effects.
pub fn verify_payment_signature(
    order_id: &str,
    payment_id: &str,
    signature: &str,
    secret: &Secret<String>,
) -> Result<bool, SignatureError> {
    if secret.is_empty() {
        return Err(SignatureError::MissingSecret);
    }
    let message = format!("{order_id}|{payment_id}");
    let expected = calculate_hmac(secret.reveal(), message.as_bytes());
    Ok(expected == signature)
}
