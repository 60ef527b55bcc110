// ABOUTME: Mock HubSpot servers spawned on ephemeral ports for tests
// ABOUTME: Serves token and contacts endpoints with scriptable responses
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use axum::Router;
use hubspot_bridge::config::HubSpotConfig;

/// Serve a router on an ephemeral local port; returns the base URL
pub async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind ephemeral port");
    let addr = listener.local_addr().expect("missing local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock server failed");
    });

    format!("http://{addr}")
}

/// HubSpot configuration pointing every endpoint at a mock base URL
pub fn hubspot_config(base_url: &str) -> HubSpotConfig {
    HubSpotConfig {
        client_id: "test-client-id".to_owned(),
        client_secret: "test-client-secret".to_owned(),
        auth_url: format!("{base_url}/oauth/authorize"),
        token_url: format!("{base_url}/oauth/v1/token"),
        api_base: base_url.to_owned(),
        redirect_uri: "http://localhost:8000/api/integrations/hubspot/callback".to_owned(),
        scope: "crm.objects.contacts.read".to_owned(),
    }
}
