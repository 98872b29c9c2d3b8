// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Key material and token builders shared by the integration suite.
//!
//! The PEM files under `tests/keys/` are throwaway 2048-bit RSA pairs used
//! only by tests; the crate's unit tests read the same files.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use jsonwebtoken::{get_current_timestamp, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

/// Public half of the keypair the gateway under test is configured with.
pub const RSA_PUBLIC_PEM: &str = include_str!("../keys/rsa2048.pub.pem");

/// Private half of the same pair, used to mint accepted tokens.
pub const RSA_PRIVATE_PEM: &str = include_str!("../keys/rsa2048.pem");

/// Private key from an unrelated pair, for forged-signature tests.
pub const FOREIGN_RSA_PRIVATE_PEM: &str = include_str!("../keys/foreign_rsa2048.pem");

/// Sign `claims` with the key the gateway under test trusts.
pub fn sign(claims: &Value) -> String {
    sign_with(claims, RSA_PRIVATE_PEM)
}

/// Sign `claims` with an arbitrary RSA private key.
pub fn sign_with(claims: &Value, private_pem: &str) -> String {
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).expect("test private key");
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).expect("sign test token")
}

/// A token accepted by the gateway, with the given subject and role.
pub fn fresh_token(sub: &str, role: Option<&str>) -> String {
    let mut claims = json!({
        "sub": sub,
        "exp": get_current_timestamp() + 300,
    });
    if let Some(role) = role {
        claims["role"] = Value::String(role.to_string());
    }
    sign(&claims)
}

/// A raw unsigned JWT with `alg: none`, built by hand.
pub fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&json!({"alg": "none"})).unwrap());
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.")
}
