// ABOUTME: Contacts fetcher with reactive token refresh and a single retry
// ABOUTME: Normalizes HubSpot contact records to a fixed field projection
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! # Contacts Fetcher
//!
//! Retrieves a bounded page of contacts for a user. Token expiry is
//! discovered reactively: a 401 triggers one refresh through the OAuth
//! client followed by exactly one retry. Never a retry loop - repeated
//! calls must not mask a persistently broken credential.

use crate::constants::contacts as contacts_constants;
use crate::oauth::{hubspot::HubSpotOAuthClient, RefreshError};
use crate::store::{CredentialStore, StoreError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

/// Normalized contact record; missing properties default to empty strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: String,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
}

/// One page of contacts plus metadata about the fetch
#[derive(Debug, Clone, Serialize)]
pub struct ContactsPage {
    /// Normalized contacts
    pub contacts: Vec<Contact>,
    /// Number of contacts returned
    pub total: usize,
    /// Whether the access token was refreshed during this fetch
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub token_refreshed: bool,
}

/// Contact fetch error taxonomy
///
/// Every refresh failure - terminal or transient - surfaces here as
/// [`ContactsError::TokenExpired`]; the distinction matters only for
/// logging, not for the caller-visible contract.
#[derive(Debug, Error)]
pub enum ContactsError {
    /// No stored credential for this user
    #[error("user not connected")]
    NotConnected,

    /// Access token expired and could not be refreshed
    #[error("token expired and refresh did not recover")]
    TokenExpired,

    /// Resource API returned 403
    #[error("insufficient permissions for contacts access")]
    InsufficientPermissions,

    /// Resource API returned an unexpected status
    #[error("upstream API error: status {0}")]
    Upstream(u16),

    /// Transport-level failure reaching the resource API
    #[error("network error: {0}")]
    Network(String),

    /// Credential store failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ContactsError {
    /// Stable user-facing message; never leaks raw provider error bodies
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NotConnected => "User not connected".to_owned(),
            Self::TokenExpired => "Token expired, please reconnect.".to_owned(),
            Self::InsufficientPermissions => {
                "Insufficient permissions to access contacts".to_owned()
            }
            Self::Upstream(status) => format!("HubSpot API error: {status}"),
            Self::Network(_) => "Network error - please try again later".to_owned(),
            Self::Store(_) => "Unexpected error occurred".to_owned(),
        }
    }
}

/// Raw contacts API response shapes; unknown fields are ignored
#[derive(Debug, Deserialize)]
struct ContactsApiResponse {
    #[serde(default)]
    results: Vec<RawContact>,
}

#[derive(Debug, Deserialize)]
struct RawContact {
    #[serde(default)]
    id: String,
    #[serde(default)]
    properties: RawProperties,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    firstname: Option<String>,
    lastname: Option<String>,
    email: Option<String>,
}

impl From<RawContact> for Contact {
    fn from(raw: RawContact) -> Self {
        Self {
            id: raw.id,
            firstname: raw.properties.firstname.unwrap_or_default(),
            lastname: raw.properties.lastname.unwrap_or_default(),
            email: raw.properties.email.unwrap_or_default(),
        }
    }
}

/// Fetches contact pages for users, handling one token-expiry cycle
pub struct ContactsFetcher {
    store: Arc<CredentialStore>,
    oauth: Arc<HubSpotOAuthClient>,
    http: reqwest::Client,
    api_base: String,
}

impl ContactsFetcher {
    /// Create a new fetcher
    #[must_use]
    pub fn new(
        store: Arc<CredentialStore>,
        oauth: Arc<HubSpotOAuthClient>,
        http: reqwest::Client,
        api_base: String,
    ) -> Self {
        Self {
            store,
            oauth,
            http,
            api_base,
        }
    }

    /// Issue one contacts API request with a bearer token
    async fn fetch_page(&self, access_token: &str) -> Result<reqwest::Response, reqwest::Error> {
        self.http
            .get(format!("{}/crm/v3/objects/contacts", self.api_base))
            .query(&[
                ("limit", contacts_constants::PAGE_LIMIT.to_string()),
                (
                    "properties",
                    contacts_constants::REQUESTED_PROPERTIES.to_owned(),
                ),
            ])
            .bearer_auth(access_token)
            .send()
            .await
    }

    /// Decode a 200 response into a normalized page
    async fn decode_page(
        response: reqwest::Response,
        token_refreshed: bool,
    ) -> Result<ContactsPage, ContactsError> {
        let body: ContactsApiResponse = response
            .json()
            .await
            .map_err(|e| ContactsError::Network(e.to_string()))?;

        let contacts: Vec<Contact> = body.results.into_iter().map(Contact::from).collect();
        let total = contacts.len();

        Ok(ContactsPage {
            contacts,
            total,
            token_refreshed,
        })
    }

    /// Fetch one page of contacts for a user
    ///
    /// On a 401, refreshes the access token through the OAuth client and
    /// retries exactly once with the new token. Concurrent calls for the
    /// same user may race on that refresh; last write wins in the store.
    ///
    /// # Errors
    ///
    /// See [`ContactsError`] for the full outcome taxonomy.
    pub async fn get_contacts(&self, user_id: &str) -> Result<ContactsPage, ContactsError> {
        info!("Fetching HubSpot contacts for user {user_id}");

        let Some(credentials) = self.store.load(user_id).await? else {
            warn!("No credentials found for user {user_id}");
            return Err(ContactsError::NotConnected);
        };
        if credentials.access_token.is_empty() {
            warn!("Stored record for user {user_id} has no access token");
            return Err(ContactsError::NotConnected);
        }

        let response = self
            .fetch_page(&credentials.access_token)
            .await
            .map_err(|e| ContactsError::Network(e.to_string()))?;

        match response.status().as_u16() {
            200 => Self::decode_page(response, false).await,
            401 => {
                self.refresh_and_retry(user_id, credentials.refresh_token.as_deref())
                    .await
            }
            403 => {
                warn!("Contacts request forbidden for user {user_id}");
                Err(ContactsError::InsufficientPermissions)
            }
            status => {
                warn!("Contacts request failed for user {user_id}: status {status}");
                Err(ContactsError::Upstream(status))
            }
        }
    }

    /// Handle the 401 path: one refresh, one retry
    async fn refresh_and_retry(
        &self,
        user_id: &str,
        refresh_token: Option<&str>,
    ) -> Result<ContactsPage, ContactsError> {
        warn!("Access token expired for user {user_id}, attempting refresh");

        let Some(refresh_token) = refresh_token.filter(|token| !token.is_empty()) else {
            warn!("No refresh token available for user {user_id}");
            return Err(ContactsError::TokenExpired);
        };

        let refreshed = match self.oauth.refresh(user_id, refresh_token).await {
            Ok(credentials) => credentials,
            Err(RefreshError::Reauthorize) => {
                warn!("Refresh token dead for user {user_id}; reauthorization required");
                return Err(ContactsError::TokenExpired);
            }
            Err(e) => {
                warn!("Token refresh failed for user {user_id}: {e}");
                return Err(ContactsError::TokenExpired);
            }
        };

        info!("Retrying contacts request with refreshed token for user {user_id}");
        let retry = self
            .fetch_page(&refreshed.access_token)
            .await
            .map_err(|e| ContactsError::Network(e.to_string()))?;

        match retry.status().as_u16() {
            200 => Self::decode_page(retry, true).await,
            401 => {
                warn!("Contacts request returned 401 even after refresh for user {user_id}");
                Err(ContactsError::TokenExpired)
            }
            status => {
                warn!("Retried contacts request failed for user {user_id}: status {status}");
                Err(ContactsError::Upstream(status))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_contact_defaults_missing_properties_to_empty() {
        let raw: RawContact = serde_json::from_str(r#"{"id":"101"}"#).unwrap();
        let contact = Contact::from(raw);
        assert_eq!(contact.id, "101");
        assert_eq!(contact.firstname, "");
        assert_eq!(contact.lastname, "");
        assert_eq!(contact.email, "");
    }

    #[test]
    fn api_response_tolerates_unknown_fields() {
        let body = r#"{"results":[{"id":"1","properties":{"firstname":"Ada","hs_object_id":"1"}}],"paging":{"next":{"after":"10"}}}"#;
        let parsed: ContactsApiResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 1);
        let contact = Contact::from(parsed.results.into_iter().next().unwrap());
        assert_eq!(contact.firstname, "Ada");
        assert_eq!(contact.lastname, "");
    }

    #[test]
    fn page_serialization_hides_unrefreshed_flag() {
        let page = ContactsPage {
            contacts: vec![],
            total: 0,
            token_refreshed: false,
        };
        let json = serde_json::to_value(&page).unwrap();
        assert!(json.get("token_refreshed").is_none());

        let refreshed = ContactsPage {
            contacts: vec![],
            total: 0,
            token_refreshed: true,
        };
        let json = serde_json::to_value(&refreshed).unwrap();
        assert_eq!(json["token_refreshed"], true);
    }

    #[test]
    fn user_messages_are_stable() {
        assert_eq!(ContactsError::NotConnected.user_message(), "User not connected");
        assert_eq!(
            ContactsError::TokenExpired.user_message(),
            "Token expired, please reconnect."
        );
        assert_eq!(
            ContactsError::Upstream(429).user_message(),
            "HubSpot API error: 429"
        );
    }
}
