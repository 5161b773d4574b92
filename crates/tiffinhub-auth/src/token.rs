// SPDX-FileCopyrightText: 2026 TiffinHub Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Session token issuance and validation.
//!
//! Sessions are HS256 JWTs carrying the user id, email, role, and the
//! user's token_version at issue time. Verification fails closed: any
//! decode, signature, or expiry error yields `None`. The token_version in
//! the claims is compared against the user's current value by the gateway
//! middleware, so bumping it invalidates every previously issued session.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use tiffinhub_core::{HubError, Identity, Role};

/// Claims embedded in session tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id).
    pub sub: String,
    /// Account email.
    pub email: String,
    /// Account role at issue time.
    pub role: Role,
    /// User token_version at issue time.
    pub token_version: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// The request-scoped identity this credential asserts.
    pub fn identity(&self) -> Identity {
        Identity {
            user_id: self.sub.clone(),
            email: self.email.clone(),
            role: self.role,
            token_version: self.token_version,
        }
    }
}

/// Manages session token creation and validation.
#[derive(Clone)]
pub struct SessionSigner {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl SessionSigner {
    /// Create a signer with the given HMAC secret and session lifetime.
    pub fn new(secret: &[u8], ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl_secs: ttl_days * 24 * 60 * 60,
        }
    }

    /// Session lifetime in seconds, for the cookie max-age.
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }

    /// Issue a session token for the given user.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: Role,
        token_version: i64,
    ) -> Result<String, HubError> {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            token_version,
            iat: now,
            exp: now + self.ttl_secs,
        };
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| HubError::Internal(format!("token signing failed: {e}")))
    }

    /// Validate a token and return its claims, or `None` for any failure.
    pub fn verify(&self, token: &str) -> Option<Claims> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_signer() -> SessionSigner {
        SessionSigner::new(b"test-secret-key-of-sufficient-length", 7)
    }

    #[test]
    fn issue_and_verify_round_trips() {
        let signer = test_signer();
        let token = signer
            .issue("user-1", "asha@example.com", Role::Consumer, 3)
            .unwrap();

        let claims = signer.verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.email, "asha@example.com");
        assert_eq!(claims.role, Role::Consumer);
        assert_eq!(claims.token_version, 3);
        assert_eq!(claims.exp - claims.iat, 7 * 24 * 60 * 60);
    }

    #[test]
    fn garbage_token_fails_closed() {
        let signer = test_signer();
        assert!(signer.verify("not-a-token").is_none());
        assert!(signer.verify("").is_none());
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let signer = test_signer();
        let other = SessionSigner::new(b"a-completely-different-signing-key!!", 7);
        let token = signer
            .issue("user-1", "asha@example.com", Role::Consumer, 0)
            .unwrap();
        assert!(other.verify(&token).is_none());
    }

    #[test]
    fn tampered_payload_fails_verification() {
        let signer = test_signer();
        let token = signer
            .issue("user-1", "asha@example.com", Role::Consumer, 0)
            .unwrap();
        // Flip a character in the payload segment.
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let mut payload: Vec<u8> = parts[1].clone().into_bytes();
        payload[0] = if payload[0] == b'A' { b'B' } else { b'A' };
        parts[1] = String::from_utf8(payload).unwrap();
        assert!(signer.verify(&parts.join(".")).is_none());
    }

    #[test]
    fn claims_expose_identity() {
        let signer = test_signer();
        let token = signer
            .issue("user-9", "p@example.com", Role::Provider, 2)
            .unwrap();
        let identity = signer.verify(&token).unwrap().identity();
        assert_eq!(identity.user_id, "user-9");
        assert_eq!(identity.role, Role::Provider);
        assert_eq!(identity.token_version, 2);
    }
}
