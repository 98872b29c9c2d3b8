// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Gateway error codes and the JSON error envelope.
//!
//! Every failed request is rendered through this module, regardless of where
//! the failure originated: authentication rejections from the filter chain,
//! routing failures (unknown path, disallowed method), and internal faults
//! all end up as the same `{code, message, errors}` body with a stable
//! `GTW-xxxx` code. Internal detail is logged here and never serialized.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

/// The closed set of gateway error codes.
///
/// Each variant is a (status, code, message) triple. The table is fixed at
/// compile time; clients can rely on the `GTW-xxxx` strings staying stable
/// across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatewayErrorCode {
    /// Authorization header present but not a usable bearer token.
    InvalidToken,
    /// Authorization header absent.
    EmptyToken,
    /// Token failed signature or claim verification.
    UnauthorizedAccess,
    /// Token past its expiry.
    TokenExpired,
    /// Unexpected failure inside the gateway.
    InternalServerError,
    /// The request itself could not be processed.
    BadRequest,
    /// No route matches the request path.
    NotFound,
    /// A route matches the path but not the method.
    MethodNotAllowed,
}

impl GatewayErrorCode {
    /// HTTP status for this code.
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayErrorCode::InvalidToken
            | GatewayErrorCode::EmptyToken
            | GatewayErrorCode::UnauthorizedAccess
            | GatewayErrorCode::TokenExpired => StatusCode::UNAUTHORIZED,
            GatewayErrorCode::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            GatewayErrorCode::NotFound => StatusCode::NOT_FOUND,
            GatewayErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Stable wire code.
    pub fn code(&self) -> &'static str {
        match self {
            GatewayErrorCode::InvalidToken => "GTW-0001",
            GatewayErrorCode::EmptyToken => "GTW-0002",
            GatewayErrorCode::UnauthorizedAccess => "GTW-0003",
            GatewayErrorCode::InternalServerError => "GTW-0004",
            GatewayErrorCode::BadRequest => "GTW-0005",
            GatewayErrorCode::NotFound => "GTW-0006",
            GatewayErrorCode::MethodNotAllowed => "GTW-0007",
            GatewayErrorCode::TokenExpired => "GTW-0008",
        }
    }

    /// Client-facing message. Deliberately generic.
    pub fn message(&self) -> &'static str {
        match self {
            GatewayErrorCode::InvalidToken => "invalid token",
            GatewayErrorCode::EmptyToken => "missing token",
            GatewayErrorCode::UnauthorizedAccess => "no access",
            GatewayErrorCode::InternalServerError => "internal error",
            GatewayErrorCode::BadRequest => "bad request",
            GatewayErrorCode::NotFound => "no such path",
            GatewayErrorCode::MethodNotAllowed => "method not allowed",
            GatewayErrorCode::TokenExpired => "expired token",
        }
    }

    /// Map a transport-layer status onto the code table.
    ///
    /// Anything outside the three well-known routing statuses collapses to
    /// `InternalServerError` so unexpected statuses never invent new codes.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => GatewayErrorCode::NotFound,
            StatusCode::METHOD_NOT_ALLOWED => GatewayErrorCode::MethodNotAllowed,
            StatusCode::BAD_REQUEST => GatewayErrorCode::BadRequest,
            _ => GatewayErrorCode::InternalServerError,
        }
    }
}

/// One field-level sub-error inside an [`ErrorResponse`].
#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: String,
    pub reason: String,
    #[serde(rename = "rejectedValue")]
    pub rejected_value: serde_json::Value,
}

impl FieldError {
    pub fn new(
        field: impl Into<String>,
        reason: impl Into<String>,
        rejected_value: serde_json::Value,
    ) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
            rejected_value,
        }
    }
}

/// The JSON body sent for every failed request.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: &'static str,
    pub errors: Vec<FieldError>,
}

impl ErrorResponse {
    /// Envelope for a code, with whatever field detail the failure carries.
    pub fn with_errors(code: GatewayErrorCode, errors: Vec<FieldError>) -> Self {
        Self {
            code: code.code(),
            message: code.message(),
            errors,
        }
    }
}

/// Any failure the request pipeline can produce.
///
/// Authentication errors pass through unmodified from the filter chain;
/// routing failures carry their transport status; everything else is an
/// internal fault whose detail stays in the logs.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("rejected with status {status}")]
    Transport {
        status: StatusCode,
        errors: Vec<FieldError>,
    },
    #[error("{0}")]
    Internal(String),
}

impl GatewayError {
    pub fn not_found() -> Self {
        GatewayError::Transport {
            status: StatusCode::NOT_FOUND,
            errors: Vec::new(),
        }
    }

    pub fn method_not_allowed() -> Self {
        GatewayError::Transport {
            status: StatusCode::METHOD_NOT_ALLOWED,
            errors: Vec::new(),
        }
    }

    pub fn bad_request(errors: Vec<FieldError>) -> Self {
        GatewayError::Transport {
            status: StatusCode::BAD_REQUEST,
            errors,
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        GatewayError::Internal(detail.into())
    }

    /// Resolve this error against the code table.
    pub fn error_code(&self) -> GatewayErrorCode {
        match self {
            GatewayError::Auth(err) => err.error_code(),
            GatewayError::Transport { status, .. } => GatewayErrorCode::from_status(*status),
            GatewayError::Internal(_) => GatewayErrorCode::InternalServerError,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let code = self.error_code();
        let errors = match self {
            GatewayError::Transport { errors, .. } => errors,
            GatewayError::Internal(detail) => {
                // The generic envelope is all the client sees.
                tracing::error!(%detail, "request failed with an internal error");
                Vec::new()
            }
            GatewayError::Auth(_) => Vec::new(),
        };
        (code.status(), Json(ErrorResponse::with_errors(code, errors))).into_response()
    }
}
