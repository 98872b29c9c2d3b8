// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Gateway - Edge Authentication Gateway
//!
//! This crate fronts internal HTTP services with a single authenticating
//! edge: bearer tokens are verified against a locally held RSA public key,
//! the credential is stripped, and verified identity headers are forwarded
//! to the upstream behind the matched route.
//!
//! ## Modules
//!
//! - `auth` - token verification and the authentication filter
//! - `routing` - the declared route table and request resolution
//! - `proxy` - forwarding to upstream services
//! - `error` - the gateway error code table and JSON envelope
//! - `server` - router assembly and lifecycle

pub mod auth;
pub mod config;
pub mod error;
pub mod logging;
pub mod proxy;
pub mod routing;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod test_keys;
