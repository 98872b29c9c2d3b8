// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims.

use serde::Deserialize;

/// Role reported for tokens that carry no `role` claim.
pub const ROLE_UNKNOWN: &str = "unknown";

/// Claims the gateway reads out of a verified token.
///
/// Only the fields the gateway forwards are deserialized; everything else
/// in the payload is ignored. Time-validity claims (`exp`, `nbf`) are
/// checked inside the verifier and never surface here.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    /// Subject, forwarded upstream as the user id.
    pub sub: String,

    /// Role claim, if the issuer set one.
    #[serde(default)]
    pub role: Option<String>,
}

impl Claims {
    /// Role to forward upstream.
    ///
    /// Tokens without a role claim still authenticate; they are reported as
    /// [`ROLE_UNKNOWN`] so the forwarded header is present on every request
    /// and upstream services never have to distinguish absent from unknown.
    pub fn role(&self) -> &str {
        self.role.as_deref().unwrap_or(ROLE_UNKNOWN)
    }
}
