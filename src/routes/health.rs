// ABOUTME: Health check route handlers for service monitoring
// ABOUTME: Reports API liveness and primary store reachability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! Health check routes

use crate::constants::service;
use crate::server::ServerResources;
use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;

/// Health routes implementation
pub struct HealthRoutes;

impl HealthRoutes {
    /// Create all health check routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route("/ping", get(Self::handle_ping))
            .route("/health", get(Self::handle_health))
            .with_state(resources)
    }

    async fn handle_ping() -> Json<serde_json::Value> {
        Json(serde_json::json!({ "message": "pong" }))
    }

    /// Report API status and whether the primary credential store is
    /// reachable, independent of whether any records exist
    async fn handle_health(
        State(resources): State<Arc<ServerResources>>,
    ) -> Json<serde_json::Value> {
        let redis_connected = resources.store.health().await;

        Json(serde_json::json!({
            "api_status": "healthy",
            "service": service::SERVICE_NAME,
            "redis_connected": redis_connected,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}
