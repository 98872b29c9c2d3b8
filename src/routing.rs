// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Route table and request-to-route resolution.
//!
//! The gateway's routes are declared in a JSON file loaded once at startup.
//! Each route pairs a path prefix with an upstream base URL, optionally
//! restricted to a method set, and is protected by the authentication
//! filter unless it explicitly opts out.
//!
//! Resolution runs before authentication, so an unknown path or a
//! disallowed method is answered the same way whether or not the request
//! carries credentials.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::Method,
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use thiserror::Error;

use crate::error::GatewayError;
use crate::state::AppState;

/// One declared route.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteDefinition {
    /// Stable identifier, used in logs.
    pub id: String,
    /// Path prefix this route claims, matched on segment boundaries.
    pub path_prefix: String,
    /// Base URL of the upstream service.
    pub upstream: String,
    /// Methods this route accepts; absent means all.
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    /// Whether the authentication filter guards this route.
    #[serde(default = "default_authenticated")]
    pub authenticated: bool,
}

fn default_authenticated() -> bool {
    true
}

impl RouteDefinition {
    /// Prefix match on whole path segments: `/accounts` claims `/accounts`
    /// and `/accounts/1` but not `/accounts2`.
    fn matches_path(&self, path: &str) -> bool {
        let prefix = self.path_prefix.trim_end_matches('/');
        if prefix.is_empty() {
            return true;
        }
        match path.strip_prefix(prefix) {
            Some(rest) => rest.is_empty() || rest.starts_with('/'),
            None => false,
        }
    }

    fn allows_method(&self, method: &Method) -> bool {
        match &self.methods {
            Some(methods) => methods.iter().any(|m| m == method.as_str()),
            None => true,
        }
    }
}

/// Why a request did not resolve to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("no route matches the request path")]
    NotFound,
    #[error("a route matches the path but not the method")]
    MethodNotAllowed,
}

impl From<RouteError> for GatewayError {
    fn from(err: RouteError) -> Self {
        match err {
            RouteError::NotFound => GatewayError::not_found(),
            RouteError::MethodNotAllowed => GatewayError::method_not_allowed(),
        }
    }
}

/// Why a route file was rejected at startup.
#[derive(Debug, Error)]
pub enum RouteTableError {
    #[error("failed to read route file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("route file is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("route table is empty")]
    Empty,
    #[error("route {id}: {reason}")]
    InvalidRoute { id: String, reason: String },
}

/// The gateway's ordered route table.
///
/// Routes are matched in declaration order; the first route whose prefix
/// and method set both accept the request wins. Construction validates
/// every entry, so startup fails instead of requests.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Arc<RouteDefinition>>,
}

impl RouteTable {
    /// Validate the declarations and build the table.
    pub fn new(routes: Vec<RouteDefinition>) -> Result<Self, RouteTableError> {
        if routes.is_empty() {
            return Err(RouteTableError::Empty);
        }

        let mut seen = std::collections::HashSet::new();
        let mut validated = Vec::with_capacity(routes.len());
        for mut route in routes {
            validate_route(&route)?;
            if !seen.insert(route.id.clone()) {
                return Err(RouteTableError::InvalidRoute {
                    id: route.id,
                    reason: "duplicate route id".to_string(),
                });
            }
            if let Some(methods) = &mut route.methods {
                for method in methods.iter_mut() {
                    *method = method.to_ascii_uppercase();
                }
            }
            validated.push(Arc::new(route));
        }
        Ok(Self { routes: validated })
    }

    /// Read a JSON route file and build the table.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouteTableError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| RouteTableError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let routes: Vec<RouteDefinition> = serde_json::from_slice(&bytes)?;
        Self::new(routes)
    }

    /// Find the route for a request path and method.
    ///
    /// A path claimed by some route but with no route accepting the method
    /// is reported as [`RouteError::MethodNotAllowed`]; a path claimed by
    /// nothing is [`RouteError::NotFound`].
    pub fn resolve(&self, path: &str, method: &Method) -> Result<Arc<RouteDefinition>, RouteError> {
        let mut path_matched = false;
        for route in &self.routes {
            if !route.matches_path(path) {
                continue;
            }
            if route.allows_method(method) {
                return Ok(route.clone());
            }
            path_matched = true;
        }
        if path_matched {
            Err(RouteError::MethodNotAllowed)
        } else {
            Err(RouteError::NotFound)
        }
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

fn validate_route(route: &RouteDefinition) -> Result<(), RouteTableError> {
    let invalid = |reason: String| RouteTableError::InvalidRoute {
        id: route.id.clone(),
        reason,
    };

    if route.id.is_empty() {
        return Err(RouteTableError::InvalidRoute {
            id: "<unnamed>".to_string(),
            reason: "route id is empty".to_string(),
        });
    }
    if !route.path_prefix.starts_with('/') {
        return Err(invalid(format!(
            "path prefix {:?} does not start with '/'",
            route.path_prefix
        )));
    }

    let upstream = url::Url::parse(&route.upstream)
        .map_err(|err| invalid(format!("upstream is not a valid URL: {err}")))?;
    if !matches!(upstream.scheme(), "http" | "https") {
        return Err(invalid(format!(
            "upstream scheme {:?} is not http or https",
            upstream.scheme()
        )));
    }
    if upstream.host_str().is_none() {
        return Err(invalid("upstream has no host".to_string()));
    }
    if upstream.query().is_some() || upstream.fragment().is_some() {
        return Err(invalid(
            "upstream must not carry a query or fragment".to_string(),
        ));
    }

    if let Some(methods) = &route.methods {
        if methods.is_empty() {
            return Err(invalid("methods list is empty".to_string()));
        }
        for method in methods {
            Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                .map_err(|_| invalid(format!("{method:?} is not an HTTP method")))?;
        }
    }
    Ok(())
}

/// The route a request resolved to, carried in request extensions from the
/// resolver to the authentication filter and the forwarder.
#[derive(Debug, Clone)]
pub struct MatchedRoute(Arc<RouteDefinition>);

impl MatchedRoute {
    pub fn new(route: Arc<RouteDefinition>) -> Self {
        Self(route)
    }

    pub fn requires_auth(&self) -> bool {
        self.0.authenticated
    }

    pub fn definition(&self) -> &RouteDefinition {
        &self.0
    }
}

/// Middleware resolving each request against the route table.
///
/// Unroutable requests are rejected here, before authentication, so the
/// routing outcome never depends on credentials.
pub async fn resolve_route(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let route = match state.routes.resolve(request.uri().path(), request.method()) {
        Ok(route) => route,
        Err(err) => return GatewayError::from(err).into_response(),
    };
    tracing::debug!(route = %route.id, path = %request.uri().path(), "route resolved");
    request.extensions_mut().insert(MatchedRoute::new(route));
    next.run(request).await
}
