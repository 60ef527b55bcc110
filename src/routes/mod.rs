// ABOUTME: HTTP route modules and top-level router assembly
// ABOUTME: Maps inbound requests onto the store, OAuth client, and fetcher
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! HTTP boundary layer

/// Health and liveness routes
pub mod health;
/// HubSpot integration routes
pub mod hubspot;

use crate::server::ServerResources;
use axum::Router;
use std::sync::Arc;

/// Assemble the full application router
#[must_use]
pub fn router(resources: Arc<ServerResources>) -> Router {
    Router::new()
        .merge(health::HealthRoutes::routes(resources.clone()))
        .merge(hubspot::HubSpotRoutes::routes(resources))
}
