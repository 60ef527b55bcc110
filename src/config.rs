// ABOUTME: Environment-based configuration for deployment-specific settings
// ABOUTME: Parses environment variables into typed config structs with defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! Environment-only configuration
//!
//! All settings come from environment variables with development-friendly
//! defaults. HubSpot client credentials are intentionally allowed to be
//! absent at startup: the process boots, and requests that need them fail
//! with a configuration error, matching the fail-per-request contract.

use crate::constants::{hubspot, ports, timeouts};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;

/// Environment type, drives logging format defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl Environment {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "testing" | "test" => Self::Testing,
            _ => Self::Development,
        }
    }

    /// Check if this is a production environment
    #[must_use]
    pub const fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// HubSpot OAuth application settings
#[derive(Debug, Clone)]
pub struct HubSpotConfig {
    /// OAuth client ID (may be empty; checked per request)
    pub client_id: String,
    /// OAuth client secret (may be empty; checked per request)
    pub client_secret: String,
    /// Authorization page URL
    pub auth_url: String,
    /// Token endpoint URL
    pub token_url: String,
    /// Resource API base URL
    pub api_base: String,
    /// Redirect URI registered with the HubSpot app
    pub redirect_uri: String,
    /// Requested OAuth scope string
    pub scope: String,
}

impl HubSpotConfig {
    /// Load from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            client_id: env::var("HUBSPOT_CLIENT_ID").unwrap_or_default(),
            client_secret: env::var("HUBSPOT_CLIENT_SECRET").unwrap_or_default(),
            auth_url: env::var("HUBSPOT_AUTH_URL")
                .unwrap_or_else(|_| hubspot::DEFAULT_AUTH_URL.to_owned()),
            token_url: env::var("HUBSPOT_TOKEN_URL")
                .unwrap_or_else(|_| hubspot::DEFAULT_TOKEN_URL.to_owned()),
            api_base: env::var("HUBSPOT_API_BASE")
                .unwrap_or_else(|_| hubspot::DEFAULT_API_BASE.to_owned()),
            redirect_uri: env::var("REDIRECT_URI").unwrap_or_else(|_| {
                format!(
                    "http://localhost:{}/api/integrations/hubspot/callback",
                    ports::DEFAULT_HTTP_PORT
                )
            }),
            scope: env::var("HUBSPOT_SCOPES")
                .unwrap_or_else(|_| hubspot::REQUESTED_SCOPE.to_owned()),
        }
    }

    /// Check that both client credentials are configured
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Credential store backend settings
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Redis connection URL for the primary tier
    pub redis_url: String,
    /// Redis connection establishment timeout in seconds
    pub connection_timeout_secs: u64,
    /// Redis per-command response timeout in seconds
    pub response_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_owned(),
            connection_timeout_secs: timeouts::REDIS_CONNECT_TIMEOUT_SECS,
            response_timeout_secs: timeouts::REDIS_RESPONSE_TIMEOUT_SECS,
        }
    }
}

impl StoreConfig {
    /// Load from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            connection_timeout_secs: env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.connection_timeout_secs),
            response_timeout_secs: env::var("REDIS_RESPONSE_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.response_timeout_secs),
        }
    }
}

/// Top-level server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP listen port
    pub http_port: u16,
    /// Frontend base URL for post-callback redirects
    pub frontend_url: String,
    /// Deployment environment
    pub environment: Environment,
    /// HubSpot OAuth application settings
    pub hubspot: HubSpotConfig,
    /// Credential store settings
    pub store: StoreConfig,
}

impl ServerConfig {
    /// Load the full configuration from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if a present variable fails to parse (e.g. a
    /// non-numeric `PORT`).
    pub fn from_env() -> Result<Self> {
        let http_port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .with_context(|| format!("invalid PORT value: {raw}"))?,
            Err(_) => ports::DEFAULT_HTTP_PORT,
        };

        Ok(Self {
            http_port,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_owned()),
            environment: Environment::from_str_or_default(
                &env::var("ENVIRONMENT").unwrap_or_default(),
            ),
            hubspot: HubSpotConfig::from_env(),
            store: StoreConfig::from_env(),
        })
    }
}
