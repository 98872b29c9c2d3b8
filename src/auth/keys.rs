// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! RSA verification key loading.
//!
//! The gateway trusts exactly one RSA public key, read from a PEM file on
//! disk at startup. Loading is fail-fast: a missing file, a non-PEM body,
//! a PEM block of the wrong kind, or key material that is not an RSA public
//! key all abort startup instead of surfacing later as per-request 500s.

use std::fmt;
use std::path::{Path, PathBuf};

use jsonwebtoken::DecodingKey;
use thiserror::Error;

/// PEM tag expected on the configured key file (SubjectPublicKeyInfo).
const PUBLIC_KEY_TAG: &str = "PUBLIC KEY";

/// Why a key file was rejected.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("failed to read key file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("key file is not valid PEM: {0}")]
    MalformedPem(#[from] pem::PemError),
    #[error("expected a {PUBLIC_KEY_TAG} block, found {0}")]
    UnexpectedTag(String),
    #[error("key material is not an RSA public key: {0}")]
    InvalidKey(#[from] jsonwebtoken::errors::Error),
}

/// The gateway's configured RSA public key.
///
/// Construction validates the PEM envelope and the key material, so a value
/// of this type is always usable for signature verification.
pub struct VerificationKey {
    key: DecodingKey,
}

impl VerificationKey {
    /// Load the key from a PEM file.
    pub fn from_pem_file(path: impl AsRef<Path>) -> Result<Self, KeyError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| KeyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_pem(&bytes)
    }

    /// Parse the key from PEM bytes.
    pub fn from_pem(bytes: &[u8]) -> Result<Self, KeyError> {
        let block = pem::parse(bytes)?;
        if block.tag() != PUBLIC_KEY_TAG {
            return Err(KeyError::UnexpectedTag(block.tag().to_string()));
        }
        // Re-encode the parsed block so the decoder sees exactly the
        // material the tag check ran against.
        let key = DecodingKey::from_rsa_pem(pem::encode(&block).as_bytes())?;
        Ok(Self { key })
    }

    pub(crate) fn decoding_key(&self) -> &DecodingKey {
        &self.key
    }
}

impl fmt::Debug for VerificationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Key material stays out of logs.
        f.debug_struct("VerificationKey").finish_non_exhaustive()
    }
}
