// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request forwarding to upstream services.
//!
//! Once a request has been resolved and authenticated it is replayed
//! against the matched route's upstream: same method, same path and query,
//! same body, with hop-by-hop headers dropped in both directions. The
//! identity headers written by the authentication filter travel with the
//! request; the upstream's answer is relayed back as-is.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap, Uri},
    response::{IntoResponse, Response},
};

use crate::error::{FieldError, GatewayError};
use crate::routing::MatchedRoute;
use crate::state::AppState;

/// Largest body the gateway will buffer, for request forwarding and
/// response relay alike.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// Headers that describe the connection rather than the request, dropped in
/// both directions.
const HOP_BY_HOP_HEADERS: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Fallback handler forwarding an authenticated request upstream.
pub async fn forward(State(state): State<AppState>, request: Request) -> Response {
    match proxy_request(&state, request).await {
        Ok(response) => response,
        Err(err) => err.into_response(),
    }
}

async fn proxy_request(state: &AppState, request: Request) -> Result<Response, GatewayError> {
    let route = request
        .extensions()
        .get::<MatchedRoute>()
        .cloned()
        .ok_or_else(|| {
            GatewayError::internal("request reached the forwarder without a resolved route")
        })?;
    let route = route.definition();

    let (parts, body) = request.into_parts();
    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|_| {
        GatewayError::bad_request(vec![FieldError::new(
            "body",
            "body could not be read or exceeds the forwarding limit",
            serde_json::Value::Null,
        )])
    })?;

    let url = upstream_url(&route.upstream, &parts.uri);
    let mut headers = parts.headers;
    strip_connection_headers(&mut headers);
    // reqwest derives Host and Content-Length from the target and body.
    headers.remove(header::HOST);
    headers.remove(header::CONTENT_LENGTH);

    tracing::debug!(route = %route.id, %url, "forwarding upstream");
    let mut upstream = state
        .http
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await
        .map_err(|err| {
            GatewayError::internal(format!("route {}: upstream request failed: {err}", route.id))
        })?;

    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    strip_connection_headers(&mut headers);
    // The relayed body is re-framed, so the upstream's length is stale.
    headers.remove(header::CONTENT_LENGTH);
    let mut bytes = Vec::new();
    loop {
        let chunk = upstream.chunk().await.map_err(|err| {
            GatewayError::internal(format!("route {}: upstream body failed: {err}", route.id))
        })?;
        let Some(chunk) = chunk else { break };
        if bytes.len() + chunk.len() > MAX_BODY_BYTES {
            return Err(GatewayError::internal(format!(
                "route {}: upstream response exceeds the relay limit",
                route.id
            )));
        }
        bytes.extend_from_slice(&chunk);
    }

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

fn upstream_url(upstream: &str, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| uri.path());
    format!("{}{}", upstream.trim_end_matches('/'), path_and_query)
}

fn strip_connection_headers(headers: &mut HeaderMap) {
    for name in HOP_BY_HOP_HEADERS {
        headers.remove(*name);
    }
}
