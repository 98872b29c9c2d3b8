// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The gateway's authentication filter.
//!
//! Every request to a protected route passes through here before it is
//! forwarded. The filter reads the `Authorization` header, verifies the
//! bearer token, and rewrites the request so upstream services receive
//! trusted identity headers instead of the raw credential:
//!
//! - `Authorization` is removed,
//! - `x-user-id` carries the verified subject,
//! - `x-user-role` carries the verified role (or `unknown`).
//!
//! Client-supplied values for the identity headers never survive the
//! filter: protected routes overwrite them with verified values, public
//! routes have them removed. Upstream services can trust that the headers,
//! when present, were written by the gateway.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderName, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};

use super::error::AuthError;
use super::verifier::{TokenVerifier, VerifyError};
use crate::error::GatewayError;
use crate::routing::MatchedRoute;
use crate::state::AppState;

/// Header carrying the verified subject upstream.
pub const HEADER_USER_ID: HeaderName = HeaderName::from_static("x-user-id");
/// Header carrying the verified role upstream.
pub const HEADER_USER_ROLE: HeaderName = HeaderName::from_static("x-user-role");

/// Scheme prefix, matched case-sensitively.
const BEARER_PREFIX: &str = "Bearer ";

/// Middleware enforcing bearer authentication on protected routes.
///
/// Runs after route resolution; routes marked public in the route table
/// pass through untouched. A request that reaches this filter without a
/// resolved route is treated as protected.
pub async fn require_bearer(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let public = request
        .extensions()
        .get::<MatchedRoute>()
        .is_some_and(|route| !route.requires_auth());
    if public {
        // No verification happens here, so nothing may impersonate it.
        let headers = request.headers_mut();
        headers.remove(HEADER_USER_ID);
        headers.remove(HEADER_USER_ROLE);
        return next.run(request).await;
    }

    match authenticate(&state.verifier, request) {
        Ok(request) => next.run(request).await,
        Err(err) => GatewayError::from(err).into_response(),
    }
}

/// Run the authentication state machine over one request.
///
/// On success the returned request has the credential stripped and the
/// identity headers set; on failure the request is consumed and the caller
/// renders the rejection.
pub fn authenticate(
    verifier: &TokenVerifier,
    mut request: Request,
) -> Result<Request, AuthError> {
    let header = match request.headers().get(AUTHORIZATION) {
        Some(header) => header,
        None => return Err(AuthError::EmptyToken),
    };

    let header = header.to_str().map_err(|_| AuthError::InvalidToken)?;
    let token = match header.strip_prefix(BEARER_PREFIX) {
        Some(token) => token,
        None => return Err(AuthError::InvalidToken),
    };

    let claims = verifier.verify(token).map_err(|err| match err {
        VerifyError::Expired => {
            tracing::debug!("rejected an expired bearer token");
            AuthError::TokenExpired
        }
        VerifyError::Invalid(err) => {
            tracing::warn!(error = %err, "rejected a bearer token");
            AuthError::UnauthorizedAccess
        }
    })?;

    let user_id = HeaderValue::from_str(&claims.sub).map_err(|_| {
        tracing::warn!("verified subject is not a usable header value");
        AuthError::UnauthorizedAccess
    })?;
    let user_role = HeaderValue::from_str(claims.role()).map_err(|_| {
        tracing::warn!("verified role is not a usable header value");
        AuthError::UnauthorizedAccess
    })?;

    let headers = request.headers_mut();
    headers.remove(AUTHORIZATION);
    headers.insert(HEADER_USER_ID, user_id);
    headers.insert(HEADER_USER_ROLE, user_role);
    Ok(request)
}
