// ABOUTME: HubSpot OAuth2 integration bridge library
// ABOUTME: Authorization flow, per-user token lifecycle, and contacts API access
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! # HubSpot Bridge
//!
//! A thin OAuth2 integration bridge between a web platform and the HubSpot
//! CRM API. The bridge initiates the authorization-code flow, exchanges the
//! callback code for tokens, persists tokens per user in Redis (with an
//! in-memory fallback for development), refreshes expired tokens reactively,
//! and fetches a bounded page of contact records.
//!
//! ## Components
//!
//! - [`store`] - two-tier credential persistence (Redis primary, memory fallback)
//! - [`oauth`] - authorization URL construction, code exchange, token refresh
//! - [`contacts`] - contact fetching with a single refresh-and-retry cycle
//! - [`routes`] - axum HTTP boundary mapping requests onto the components

pub mod config;
pub mod constants;
pub mod contacts;
pub mod errors;
pub mod logging;
pub mod oauth;
pub mod routes;
pub mod server;
pub mod store;
