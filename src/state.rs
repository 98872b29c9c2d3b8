// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenVerifier;
use crate::routing::RouteTable;

/// Upstream calls that outlive this are failed and reported as internal
/// errors rather than left hanging.
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Clone)]
pub struct AppState {
    pub verifier: Arc<TokenVerifier>,
    pub routes: Arc<RouteTable>,
    pub http: reqwest::Client,
}

impl AppState {
    pub fn new(verifier: TokenVerifier, routes: RouteTable) -> Self {
        Self {
            verifier: Arc::new(verifier),
            routes: Arc::new(routes),
            // Redirects are relayed to the client, never followed here.
            http: reqwest::Client::builder()
                .timeout(UPSTREAM_TIMEOUT)
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .expect("failed to create the upstream HTTP client"),
        }
    }
}
