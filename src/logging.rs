// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request and response logging.
//!
//! Every request is logged on receipt and on completion, keyed by the
//! `x-request-id` header assigned at the edge of the middleware stack. The
//! same id is forwarded upstream, so one request can be traced across the
//! gateway and the service behind it.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderName,
    middleware::Next,
    response::Response,
};

pub const HEADER_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Middleware logging one line in and one line out per request.
pub async fn log_requests(request: Request, next: Next) -> Response {
    let request_id = request
        .headers()
        .get(HEADER_REQUEST_ID)
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_owned();
    let method = request.method().clone();
    let uri = request.uri().clone();
    tracing::info!(%request_id, %method, %uri, "request received");

    let started = Instant::now();
    let response = next.run(request).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    tracing::info!(
        %request_id,
        status = response.status().as_u16(),
        elapsed_ms,
        "request completed"
    );
    response
}
