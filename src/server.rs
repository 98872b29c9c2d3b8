// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Router assembly and process lifecycle.
//!
//! The request pipeline, outermost first:
//!
//! 1. request-id assignment and propagation (`x-request-id`)
//! 2. request/response logging
//! 3. route resolution against the route table
//! 4. the authentication filter
//! 5. forwarding to the matched upstream
//!
//! Resolution runs before authentication on purpose: an unroutable request
//! is answered 404/405 whether or not it carries credentials. Only
//! `/healthz` is served by the gateway itself.

use axum::{middleware, routing::get, Json, Router};
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};

use crate::error::GatewayError;
use crate::state::AppState;
use crate::{auth, logging, proxy, routing};

pub fn router(state: AppState) -> Router {
    let proxied = Router::new()
        .fallback(proxy::forward)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::filter::require_bearer,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routing::resolve_route,
        ));

    Router::new()
        .route("/healthz", get(health))
        .merge(proxied)
        .method_not_allowed_fallback(method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(middleware::from_fn(logging::log_requests))
                .layer(PropagateRequestIdLayer::x_request_id()),
        )
        .with_state(state)
}

/// Liveness probe. Served locally, never forwarded, never authenticated.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Rendered when a gateway-owned path is hit with the wrong method. Proxied
/// paths never reach this; their method checks happen during resolution.
async fn method_not_allowed() -> GatewayError {
    GatewayError::method_not_allowed()
}

/// Resolves when the process is asked to stop (Ctrl+C or SIGTERM).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{TokenVerifier, VerificationKey};
    use crate::routing::RouteTable;
    use crate::test_keys::RSA_PUBLIC_PEM;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::json;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        let verifier =
            TokenVerifier::new(VerificationKey::from_pem(RSA_PUBLIC_PEM.as_bytes()).unwrap());
        let routes = RouteTable::new(
            serde_json::from_value(json!([
                {
                    "id": "accounts",
                    "path_prefix": "/accounts",
                    "upstream": "http://accounts.internal:8080",
                    "methods": ["GET", "POST"],
                },
            ]))
            .unwrap(),
        )
        .unwrap();
        AppState::new(verifier, routes)
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn router_builds() {
        let app = router(test_state());
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn health_needs_no_credentials() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn protected_route_rejects_missing_credentials() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/accounts/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["code"], "GTW-0002");
    }

    #[tokio::test]
    async fn unknown_path_is_answered_before_authentication() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/nowhere")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "GTW-0006");
    }

    #[tokio::test]
    async fn disallowed_method_is_answered_before_authentication() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/accounts/1")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_json(response).await["code"], "GTW-0007");
    }

    #[tokio::test]
    async fn wrong_method_on_a_gateway_endpoint_renders_the_envelope() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "GTW-0007");
        assert_eq!(body["message"], "method not allowed");
    }

    #[tokio::test]
    async fn responses_carry_a_request_id() {
        let app = router(test_state());
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/healthz")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }
}
