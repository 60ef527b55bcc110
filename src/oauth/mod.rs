// ABOUTME: OAuth error taxonomy and defensive token-response parsing
// ABOUTME: Provider JSON is loosely typed; parsing applies explicit defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! # OAuth Token Lifecycle
//!
//! Implements the three authorization-code-grant operations against the
//! HubSpot OAuth endpoints: authorization URL construction, code exchange,
//! and token refresh. Terminal refresh failures (the refresh token itself
//! is dead) are kept distinct from transient ones so callers never ask a
//! user to reauthorize over a network blip.

pub mod hubspot;

use crate::constants::hubspot as hubspot_constants;
use crate::store::{Credentials, StoreError};
use serde::Deserialize;
use thiserror::Error;

/// Errors from authorization URL construction and code exchange
#[derive(Debug, Error)]
pub enum OAuthError {
    /// Client id or secret is not configured
    #[error("HubSpot OAuth not configured: {0}")]
    Configuration(String),

    /// Token endpoint returned a non-200 response during code exchange
    #[error("token exchange failed with status {status}: {body}")]
    ExchangeFailed {
        /// HTTP status returned by the token endpoint
        status: u16,
        /// Provider response body, surfaced to the caller as detail text
        body: String,
    },

    /// Token endpoint returned 200 but the body is missing required fields
    #[error("invalid token response from provider: {0}")]
    InvalidResponse(String),

    /// Transport-level failure reaching the token endpoint
    #[error("network error during token exchange: {0}")]
    Network(String),

    /// Credential persistence failed after a successful exchange
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors from token refresh
///
/// [`RefreshError::Reauthorize`] is terminal: the refresh token itself is
/// invalid or expired and the user must go through the flow again. All
/// other variants are transient from the caller's perspective.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// Refresh token invalid or expired; the user must reconnect
    #[error("refresh token expired or revoked - reauthorization required")]
    Reauthorize,

    /// Token endpoint returned 200 without an access token
    #[error("invalid refresh response from provider: {0}")]
    InvalidResponse(String),

    /// Refresh failed for a reason that may not recur
    #[error("transient token refresh failure: {0}")]
    Transient(String),
}

/// Raw token endpoint response; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_in: Option<i64>,
    token_type: Option<String>,
    scope: Option<String>,
}

/// Parse a token endpoint body into a typed credential record
///
/// `access_token` is required. `refresh_token` falls back to
/// `previous_refresh_token` because providers are not required to rotate
/// it on refresh. The remaining fields take their documented defaults.
///
/// # Errors
///
/// Returns a description of the problem when the body is not valid JSON
/// or `access_token` is absent.
pub(crate) fn parse_token_response(
    body: &str,
    requested_scope: &str,
    previous_refresh_token: Option<&str>,
) -> Result<Credentials, String> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| format!("malformed JSON: {e}"))?;

    let access_token = response
        .access_token
        .filter(|token| !token.is_empty())
        .ok_or_else(|| "missing access_token".to_owned())?;

    Ok(Credentials {
        access_token,
        refresh_token: response
            .refresh_token
            .or_else(|| previous_refresh_token.map(str::to_owned)),
        expires_in: response
            .expires_in
            .unwrap_or(hubspot_constants::DEFAULT_EXPIRES_IN_SECS),
        token_type: response
            .token_type
            .unwrap_or_else(|| hubspot_constants::DEFAULT_TOKEN_TYPE.to_owned()),
        scope: response
            .scope
            .unwrap_or_else(|| requested_scope.to_owned()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCOPE: &str = "crm.objects.contacts.read";

    #[test]
    fn full_response_parses_all_fields() {
        let body = r#"{"access_token":"tok1","refresh_token":"ref1","expires_in":1800,"token_type":"bearer","scope":"crm.objects.contacts.read"}"#;
        let creds = parse_token_response(body, SCOPE, None).unwrap();
        assert_eq!(creds.access_token, "tok1");
        assert_eq!(creds.refresh_token.as_deref(), Some("ref1"));
        assert_eq!(creds.expires_in, 1800);
    }

    #[test]
    fn optional_fields_take_defaults() {
        let body = r#"{"access_token":"tok1"}"#;
        let creds = parse_token_response(body, SCOPE, None).unwrap();
        assert_eq!(creds.refresh_token, None);
        assert_eq!(creds.expires_in, 21_600);
        assert_eq!(creds.token_type, "bearer");
        assert_eq!(creds.scope, SCOPE);
    }

    #[test]
    fn missing_refresh_token_reuses_previous_one() {
        let body = r#"{"access_token":"tok2"}"#;
        let creds = parse_token_response(body, SCOPE, Some("ref1")).unwrap();
        assert_eq!(creds.refresh_token.as_deref(), Some("ref1"));
    }

    #[test]
    fn provider_rotated_refresh_token_wins() {
        let body = r#"{"access_token":"tok2","refresh_token":"ref2"}"#;
        let creds = parse_token_response(body, SCOPE, Some("ref1")).unwrap();
        assert_eq!(creds.refresh_token.as_deref(), Some("ref2"));
    }

    #[test]
    fn missing_access_token_is_rejected() {
        let body = r#"{"refresh_token":"ref1"}"#;
        assert!(parse_token_response(body, SCOPE, None).is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let body = r#"{"access_token":"tok1","hub_domain":"example.hubspot.com","hub_id":123}"#;
        assert!(parse_token_response(body, SCOPE, None).is_ok());
    }
}
