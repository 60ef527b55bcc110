// ABOUTME: Component wiring and HTTP server startup
// ABOUTME: Builds the store, OAuth client, and fetcher, then serves the router
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! Server composition
//!
//! All components are built once here and shared by reference
//! ([`ServerResources`]); nothing holds module-level global state.

use crate::config::ServerConfig;
use crate::constants::timeouts;
use crate::contacts::ContactsFetcher;
use crate::oauth::hubspot::HubSpotOAuthClient;
use crate::store::CredentialStore;
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

/// Shared server state handed to every route handler
pub struct ServerResources {
    /// Full server configuration
    pub config: ServerConfig,
    /// Two-tier credential store
    pub store: Arc<CredentialStore>,
    /// HubSpot OAuth client
    pub oauth: Arc<HubSpotOAuthClient>,
    /// Contacts fetcher
    pub contacts: ContactsFetcher,
}

impl ServerResources {
    /// Wire all components over an already-constructed store
    #[must_use]
    pub fn new(config: ServerConfig, store: Arc<CredentialStore>) -> Self {
        let http = outbound_client();
        let oauth = Arc::new(HubSpotOAuthClient::new(
            config.hubspot.clone(),
            http.clone(),
            store.clone(),
        ));
        let contacts = ContactsFetcher::new(
            store.clone(),
            oauth.clone(),
            http,
            config.hubspot.api_base.clone(),
        );

        Self {
            config,
            store,
            oauth,
            contacts,
        }
    }
}

/// Build the outbound HTTP client with connect and request timeouts so a
/// hanging upstream cannot stall the calling request
#[must_use]
pub fn outbound_client() -> reqwest::Client {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeouts::HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(timeouts::HTTP_REQUEST_TIMEOUT_SECS))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

/// Run the HTTP server until shutdown
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn run(config: ServerConfig) -> Result<()> {
    let store = Arc::new(CredentialStore::connect(&config.store).await);
    let port = config.http_port;
    let resources = Arc::new(ServerResources::new(config, store));

    let app = crate::routes::router(resources)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            timeouts::SERVER_REQUEST_TIMEOUT_SECS,
        )))
        // Development posture: the frontend runs on a different origin
        .layer(CorsLayer::permissive());

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("HubSpot bridge listening on {addr}");
    axum::serve(listener, app)
        .await
        .context("HTTP server failed")?;

    Ok(())
}
