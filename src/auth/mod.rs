// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Bearer token authentication for the gateway.
//!
//! ## Auth Flow
//!
//! 1. A client obtains an RS256 token from the identity provider
//! 2. The client sends `Authorization: Bearer <token>` to the gateway
//! 3. The gateway:
//!    - verifies the signature against its configured RSA public key
//!    - checks time validity (`exp`, `nbf`) with a small leeway
//!    - strips the credential and forwards `x-user-id` / `x-user-role`
//!
//! ## Security
//!
//! - The verification key is loaded once at startup; a bad key aborts boot
//! - Routes are protected by default and must opt out in the route table
//! - Client-supplied identity headers are overwritten on every request
//! - Clock skew tolerance is 60 seconds

pub mod claims;
pub mod error;
pub mod filter;
pub mod keys;
pub mod verifier;

pub use claims::{Claims, ROLE_UNKNOWN};
pub use error::AuthError;
pub use keys::{KeyError, VerificationKey};
pub use verifier::{TokenVerifier, VerifyError};
