// ABOUTME: Axum HTTP testing utilities for integration tests
// ABOUTME: Executes requests against routers without running a full server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use tower::ServiceExt;

/// Helper to build and execute HTTP requests against axum routers
pub struct AxumTestRequest {
    method: Method,
    uri: String,
}

impl AxumTestRequest {
    /// Create a new GET request
    pub fn get(uri: &str) -> Self {
        Self {
            method: Method::GET,
            uri: uri.to_owned(),
        }
    }

    /// Create a new DELETE request
    #[allow(dead_code)]
    pub fn delete(uri: &str) -> Self {
        Self {
            method: Method::DELETE,
            uri: uri.to_owned(),
        }
    }

    /// Execute the request against the given router
    pub async fn send(self, router: Router) -> TestResponse {
        let request = Request::builder()
            .method(self.method)
            .uri(self.uri)
            .body(Body::empty())
            .expect("failed to build request");

        let response = router
            .oneshot(request)
            .await
            .expect("router returned an error");

        let status = response.status().as_u16();
        let location = response
            .headers()
            .get(axum::http::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read body");

        TestResponse {
            status,
            location,
            bytes: bytes.to_vec(),
        }
    }
}

/// Captured response for assertions
pub struct TestResponse {
    status: u16,
    location: Option<String>,
    bytes: Vec<u8>,
}

impl TestResponse {
    pub fn status(&self) -> u16 {
        self.status
    }

    /// The Location header, when the response is a redirect
    #[allow(dead_code)]
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Parse the body as JSON
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.bytes).expect("response body was not valid JSON")
    }
}
