// ABOUTME: Fixed endpoint URLs, OAuth defaults, storage TTLs, and network limits
// ABOUTME: Centralizes every magic value so components stay configuration-free
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! Application-wide constants

/// HubSpot OAuth and resource API endpoints
pub mod hubspot {
    /// Authorization page users are redirected to
    pub const DEFAULT_AUTH_URL: &str = "https://app.hubspot.com/oauth/authorize";

    /// Token endpoint for code exchange and refresh
    pub const DEFAULT_TOKEN_URL: &str = "https://api.hubapi.com/oauth/v1/token";

    /// Resource API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.hubapi.com";

    /// The one scope this bridge requests; must match the HubSpot app config
    pub const REQUESTED_SCOPE: &str = "crm.objects.contacts.read";

    /// Token type assumed when the provider omits it
    pub const DEFAULT_TOKEN_TYPE: &str = "bearer";

    /// Access token lifetime assumed when the provider omits `expires_in` (6h)
    pub const DEFAULT_EXPIRES_IN_SECS: i64 = 21_600;
}

/// Credential storage layout
pub mod storage {
    /// Namespace prefix for credential keys (`hubspot:{user_id}`)
    pub const KEY_PREFIX: &str = "hubspot:";

    /// TTL applied to persisted credential entries (30 days)
    pub const CREDENTIAL_TTL_SECS: u64 = 30 * 24 * 60 * 60;
}

/// Contacts API request shape
pub mod contacts {
    /// Fixed page size requested from the contacts endpoint
    pub const PAGE_LIMIT: u32 = 10;

    /// Explicit field projection requested from the contacts endpoint
    pub const REQUESTED_PROPERTIES: &str = "firstname,lastname,email";
}

/// Network timeout bounds so a hanging upstream cannot stall a request
pub mod timeouts {
    /// TCP connect timeout for outbound HubSpot calls
    pub const HTTP_CONNECT_TIMEOUT_SECS: u64 = 5;

    /// Full request timeout for outbound HubSpot calls
    pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 10;

    /// Redis connection establishment timeout
    pub const REDIS_CONNECT_TIMEOUT_SECS: u64 = 5;

    /// Redis per-command response timeout
    pub const REDIS_RESPONSE_TIMEOUT_SECS: u64 = 5;

    /// Whole-request timeout applied by the HTTP server middleware
    pub const SERVER_REQUEST_TIMEOUT_SECS: u64 = 30;
}

/// Server defaults
pub mod ports {
    /// Default HTTP listen port
    pub const DEFAULT_HTTP_PORT: u16 = 8000;
}

/// Service identity for logs
pub mod service {
    /// Service name reported in structured logs and health responses
    pub const SERVICE_NAME: &str = "hubspot-bridge";
}
