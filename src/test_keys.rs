// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA key material and token signing helpers shared by unit tests.
//!
//! The gateway only ever holds a public key; tests need the matching
//! private half to mint tokens, plus an unrelated keypair to prove foreign
//! signatures are rejected. Both pairs are throwaway 2048-bit keys stored
//! once under `tests/keys/` and used nowhere else; the integration suite
//! reads the same files through its `common` module.

use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;

/// Public half of the keypair the test verifier is configured with.
pub const RSA_PUBLIC_PEM: &str = include_str!("../tests/keys/rsa2048.pub.pem");

/// Private half of the keypair the test verifier is configured with.
pub const RSA_PRIVATE_PEM: &str = include_str!("../tests/keys/rsa2048.pem");

/// Private key from a different pair, for forged-signature tests.
pub const FOREIGN_RSA_PRIVATE_PEM: &str = include_str!("../tests/keys/foreign_rsa2048.pem");

/// Sign `claims` with the key the test verifier trusts.
pub fn sign(claims: &Value) -> String {
    sign_with(claims, RSA_PRIVATE_PEM)
}

/// Sign `claims` with an arbitrary RSA private key.
pub fn sign_with(claims: &Value, private_pem: &str) -> String {
    let key = EncodingKey::from_rsa_pem(private_pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&Header::new(Algorithm::RS256), claims, &key).unwrap()
}
