// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, Validation};
use thiserror::Error;

use super::claims::Claims;
use super::keys::VerificationKey;

/// Clock skew tolerated when checking `exp` and `nbf`, in seconds.
pub const CLOCK_SKEW_LEEWAY_SECS: u64 = 60;

/// Verification outcome for a rejected token.
///
/// Expiry is the one failure callers distinguish; everything else (bad
/// signature, wrong algorithm, missing claims, malformed payload) collapses
/// into [`VerifyError::Invalid`] so the response never leaks which check
/// failed.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token has expired")]
    Expired,
    #[error("token is not valid: {0}")]
    Invalid(#[source] jsonwebtoken::errors::Error),
}

/// Verifies bearer tokens against the gateway's configured key.
///
/// Built once at startup and shared across requests; verification itself is
/// pure CPU work with no locking or I/O.
#[derive(Debug)]
pub struct TokenVerifier {
    key: VerificationKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(key: VerificationKey) -> Self {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.algorithms = vec![Algorithm::RS256, Algorithm::RS384, Algorithm::RS512];
        validation.leeway = CLOCK_SKEW_LEEWAY_SECS;
        // A token that never expires is a forgery as far as the gateway is
        // concerned.
        validation.set_required_spec_claims(&["exp"]);
        validation.validate_nbf = true;
        // Tokens for this gateway carry no audience.
        validation.validate_aud = false;
        Self { key, validation }
    }

    /// Check signature and time validity, returning the claims on success.
    pub fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let data = jsonwebtoken::decode::<Claims>(token, self.key.decoding_key(), &self.validation)
            .map_err(|err| match err.kind() {
                ErrorKind::ExpiredSignature => VerifyError::Expired,
                _ => VerifyError::Invalid(err),
            })?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_keys::{self, FOREIGN_RSA_PRIVATE_PEM, RSA_PUBLIC_PEM};
    use jsonwebtoken::get_current_timestamp;
    use serde_json::json;

    fn verifier() -> TokenVerifier {
        TokenVerifier::new(VerificationKey::from_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap())
    }

    #[test]
    fn accepts_a_freshly_signed_token() {
        let token = test_keys::sign(&json!({
            "sub": "user-1",
            "role": "ADMIN",
            "exp": get_current_timestamp() + 300,
        }));
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.role(), "ADMIN");
    }

    #[test]
    fn roleless_token_still_verifies() {
        let token = test_keys::sign(&json!({
            "sub": "user-1",
            "exp": get_current_timestamp() + 300,
        }));
        let claims = verifier().verify(&token).unwrap();
        assert_eq!(claims.role(), "unknown");
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let token = test_keys::sign(&json!({
            "sub": "user-1",
            "exp": get_current_timestamp() - 3600,
        }));
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Expired));
    }

    #[test]
    fn expiry_within_leeway_is_tolerated() {
        let token = test_keys::sign(&json!({
            "sub": "user-1",
            "exp": get_current_timestamp() - 10,
        }));
        assert!(verifier().verify(&token).is_ok());
    }

    #[test]
    fn token_signed_by_another_key_is_invalid() {
        let token = test_keys::sign_with(
            &json!({
                "sub": "user-1",
                "exp": get_current_timestamp() + 300,
            }),
            FOREIGN_RSA_PRIVATE_PEM,
        );
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn hmac_signed_token_is_invalid() {
        // Downgrading to a symmetric algorithm must never pass an RSA check.
        let key = jsonwebtoken::EncodingKey::from_secret(b"guessable");
        let token = jsonwebtoken::encode(
            &jsonwebtoken::Header::new(Algorithm::HS256),
            &json!({"sub": "user-1", "exp": get_current_timestamp() + 300}),
            &key,
        )
        .unwrap();
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn token_without_expiry_is_invalid() {
        let token = test_keys::sign(&json!({"sub": "user-1"}));
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn token_not_yet_valid_is_invalid() {
        let token = test_keys::sign(&json!({
            "sub": "user-1",
            "nbf": get_current_timestamp() + 3600,
            "exp": get_current_timestamp() + 7200,
        }));
        let err = verifier().verify(&token).unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }

    #[test]
    fn garbage_is_invalid() {
        let err = verifier().verify("not.a.token").unwrap_err();
        assert!(matches!(err, VerifyError::Invalid(_)));
    }
}
