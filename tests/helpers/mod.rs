// ABOUTME: Shared test helpers for HTTP route and mock provider tests
// ABOUTME: Request builder plus ephemeral mock HubSpot servers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

pub mod axum_test;
pub mod mock_hubspot;
