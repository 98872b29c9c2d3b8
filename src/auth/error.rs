// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use crate::error::GatewayErrorCode;

/// Authentication outcome for a rejected request.
///
/// The filter produces exactly one of these per rejection; rendering into
/// the wire envelope happens in [`crate::error::GatewayError`], so nothing
/// in this module decides HTTP statuses or JSON shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// No Authorization header on the request.
    EmptyToken,
    /// Authorization header present but not a `Bearer` credential.
    InvalidToken,
    /// Token verified but is past its expiry.
    TokenExpired,
    /// Token failed signature or claim verification.
    UnauthorizedAccess,
}

impl AuthError {
    /// Map this rejection onto the gateway code table.
    pub fn error_code(&self) -> GatewayErrorCode {
        match self {
            AuthError::EmptyToken => GatewayErrorCode::EmptyToken,
            AuthError::InvalidToken => GatewayErrorCode::InvalidToken,
            AuthError::TokenExpired => GatewayErrorCode::TokenExpired,
            AuthError::UnauthorizedAccess => GatewayErrorCode::UnauthorizedAccess,
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthError::EmptyToken => write!(f, "authorization header is required"),
            AuthError::InvalidToken => {
                write!(f, "authorization header is not a bearer credential")
            }
            AuthError::TokenExpired => write!(f, "token has expired"),
            AuthError::UnauthorizedAccess => write!(f, "token verification failed"),
        }
    }
}

impl std::error::Error for AuthError {}
