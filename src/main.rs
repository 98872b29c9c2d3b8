// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use relational_gateway::auth::{TokenVerifier, VerificationKey};
use relational_gateway::config::{Config, LogFormat};
use relational_gateway::routing::RouteTable;
use relational_gateway::server;
use relational_gateway::state::AppState;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let config = Config::from_env().unwrap_or_else(|err| {
        eprintln!("configuration error: {err}");
        std::process::exit(1);
    });

    init_tracing(config.log_format);

    // Startup is fail-fast: a bad key or route file stops the process here
    // instead of surfacing as per-request errors later.
    let key = VerificationKey::from_pem_file(&config.public_key_path).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to load the verification key");
        std::process::exit(1);
    });
    let routes = RouteTable::load(&config.routes_path).unwrap_or_else(|err| {
        tracing::error!(error = %err, "failed to load the route table");
        std::process::exit(1);
    });
    tracing::info!(routes = routes.len(), "route table loaded");

    let state = AppState::new(TokenVerifier::new(key), routes);
    let app = server::router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|err| {
        tracing::error!(error = %err, %addr, "failed to bind");
        std::process::exit(1);
    });
    tracing::info!(%addr, "gateway listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(server::shutdown_signal())
        .await
        .expect("server failed");
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("relational_gateway=info"));
    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
}
