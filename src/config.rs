// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Configuration is loaded from the environment once at startup. Anything
//! missing or malformed aborts boot; there is no lazy re-reading later.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `8080` |
//! | `GATEWAY_PUBLIC_KEY` | Path to the PEM RSA public key tokens are verified against | Required |
//! | `GATEWAY_ROUTES` | Path to the JSON route table | Required |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `relational_gateway=info` |

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";
pub const PUBLIC_KEY_ENV: &str = "GATEWAY_PUBLIC_KEY";
pub const ROUTES_ENV: &str = "GATEWAY_ROUTES";
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("required environment variable {0} is not set")]
    Missing(&'static str),
    #[error("environment variable {0} has an invalid value")]
    Invalid(&'static str),
}

/// Log output format, selected via `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pretty") {
            Ok(LogFormat::Pretty)
        } else if s.eq_ignore_ascii_case("json") {
            Ok(LogFormat::Json)
        } else {
            Err(())
        }
    }
}

/// Startup configuration for the gateway process.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub public_key_path: PathBuf,
    pub routes_path: PathBuf,
    pub log_format: LogFormat,
}

impl Config {
    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let port = match env::var(PORT_ENV) {
            Ok(value) => value.parse().map_err(|_| ConfigError::Invalid(PORT_ENV))?,
            Err(_) => DEFAULT_PORT,
        };
        let public_key_path = env::var(PUBLIC_KEY_ENV)
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing(PUBLIC_KEY_ENV))?;
        let routes_path = env::var(ROUTES_ENV)
            .map(PathBuf::from)
            .map_err(|_| ConfigError::Missing(ROUTES_ENV))?;
        let log_format = match env::var(LOG_FORMAT_ENV) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid(LOG_FORMAT_ENV))?,
            Err(_) => LogFormat::Pretty,
        };

        Ok(Self {
            host,
            port,
            public_key_path,
            routes_path,
            log_format,
        })
    }

    /// Address the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
