// ABOUTME: HubSpot OAuth client covering authorize URL, code exchange, and refresh
// ABOUTME: Persists resulting credentials through the injected credential store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use super::{parse_token_response, OAuthError, RefreshError};
use crate::config::HubSpotConfig;
use crate::store::{CredentialStore, Credentials};
use std::sync::Arc;
use tracing::{error, info, warn};

/// HubSpot OAuth client
///
/// Holds the application credentials, a shared HTTP client with timeouts,
/// and the credential store the resulting tokens are persisted through.
/// Constructed once at process start and shared across requests.
pub struct HubSpotOAuthClient {
    config: HubSpotConfig,
    http: reqwest::Client,
    store: Arc<CredentialStore>,
}

impl HubSpotOAuthClient {
    /// Create a new OAuth client
    #[must_use]
    pub fn new(config: HubSpotConfig, http: reqwest::Client, store: Arc<CredentialStore>) -> Self {
        Self {
            config,
            http,
            store,
        }
    }

    /// Fail fast when client id or secret is missing
    ///
    /// The secret is required even for URL construction so misconfiguration
    /// surfaces at the start of the flow, not at the callback.
    fn ensure_configured(&self) -> Result<(), OAuthError> {
        if self.config.client_id.is_empty() {
            return Err(OAuthError::Configuration(
                "HUBSPOT_CLIENT_ID is not set".to_owned(),
            ));
        }
        if self.config.client_secret.is_empty() {
            return Err(OAuthError::Configuration(
                "HUBSPOT_CLIENT_SECRET is not set".to_owned(),
            ));
        }
        Ok(())
    }

    /// Build the authorization redirect URL for a user
    ///
    /// The user id travels in the OAuth `state` parameter and comes back
    /// on the callback, keying the stored credentials.
    ///
    /// # Errors
    ///
    /// Returns [`OAuthError::Configuration`] when client credentials are
    /// not configured.
    pub fn authorization_url(&self, user_id: &str) -> Result<String, OAuthError> {
        self.ensure_configured()?;

        let url = format!(
            "{}?client_id={}&redirect_uri={}&scope={}&response_type=code&state={}",
            self.config.auth_url,
            urlencoding::encode(&self.config.client_id),
            urlencoding::encode(&self.config.redirect_uri),
            urlencoding::encode(&self.config.scope),
            urlencoding::encode(user_id)
        );

        info!("Initiating OAuth authorization for user {user_id}");
        Ok(url)
    }

    /// Exchange an authorization code for tokens and persist them
    ///
    /// # Errors
    ///
    /// - [`OAuthError::ExchangeFailed`] on a non-200 token endpoint
    ///   response, carrying the provider body
    /// - [`OAuthError::InvalidResponse`] when the 200 body lacks an
    ///   access token
    /// - [`OAuthError::Network`] on transport failure
    pub async fn exchange_code(
        &self,
        code: &str,
        user_id: &str,
    ) -> Result<Credentials, OAuthError> {
        self.ensure_configured()?;

        info!("Exchanging authorization code for user {user_id}");

        let params = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| OAuthError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| OAuthError::Network(e.to_string()))?;

        if status.as_u16() != 200 {
            error!("Token exchange failed for user {user_id}: {status} {body}");
            return Err(OAuthError::ExchangeFailed {
                status: status.as_u16(),
                body,
            });
        }

        let credentials = parse_token_response(&body, &self.config.scope, None)
            .map_err(OAuthError::InvalidResponse)?;

        self.store.save(user_id, &credentials).await?;
        info!("OAuth flow completed for user {user_id}");

        Ok(credentials)
    }

    /// Refresh an access token and persist the full new record
    ///
    /// The stored record is overwritten whole. A provider that does not
    /// rotate the refresh token gets the supplied one carried forward.
    ///
    /// # Errors
    ///
    /// - [`RefreshError::Reauthorize`] on HTTP 400 (the refresh token
    ///   itself is dead); nothing is persisted in this case
    /// - [`RefreshError::InvalidResponse`] when the 200 body lacks an
    ///   access token
    /// - [`RefreshError::Transient`] on any other status or transport
    ///   failure
    pub async fn refresh(
        &self,
        user_id: &str,
        refresh_token: &str,
    ) -> Result<Credentials, RefreshError> {
        if self.ensure_configured().is_err() {
            return Err(RefreshError::Transient(
                "HubSpot credentials not configured".to_owned(),
            ));
        }

        info!("Refreshing access token for user {user_id}");

        let params = [
            ("grant_type", "refresh_token"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http
            .post(&self.config.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| RefreshError::Transient(format!("network error: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| RefreshError::Transient(format!("network error: {e}")))?;

        match status.as_u16() {
            200 => {}
            400 => {
                warn!("Refresh token rejected for user {user_id}: {body}");
                return Err(RefreshError::Reauthorize);
            }
            other => {
                warn!("Token refresh failed for user {user_id}: {other} {body}");
                return Err(RefreshError::Transient(format!(
                    "token endpoint returned status {other}"
                )));
            }
        }

        let credentials = parse_token_response(&body, &self.config.scope, Some(refresh_token))
            .map_err(RefreshError::InvalidResponse)?;

        self.store
            .save(user_id, &credentials)
            .await
            .map_err(|e| RefreshError::Transient(format!("failed to persist tokens: {e}")))?;
        info!("Stored refreshed credentials for user {user_id}");

        Ok(credentials)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubSpotConfig;

    fn test_config(client_id: &str, client_secret: &str) -> HubSpotConfig {
        HubSpotConfig {
            client_id: client_id.to_owned(),
            client_secret: client_secret.to_owned(),
            auth_url: "https://app.hubspot.com/oauth/authorize".to_owned(),
            token_url: "https://api.hubapi.com/oauth/v1/token".to_owned(),
            api_base: "https://api.hubapi.com".to_owned(),
            redirect_uri: "http://localhost:8000/api/integrations/hubspot/callback".to_owned(),
            scope: "crm.objects.contacts.read".to_owned(),
        }
    }

    fn client(config: HubSpotConfig) -> HubSpotOAuthClient {
        HubSpotOAuthClient::new(
            config,
            reqwest::Client::new(),
            Arc::new(CredentialStore::in_memory()),
        )
    }

    #[test]
    fn authorization_url_encodes_all_parameters() {
        let url = client(test_config("my-client", "my-secret"))
            .authorization_url("user-42")
            .unwrap();
        assert!(url.starts_with("https://app.hubspot.com/oauth/authorize?"));
        assert!(url.contains("client_id=my-client"));
        assert!(url.contains("scope=crm.objects.contacts.read"));
        assert!(url.contains("response_type=code"));
        assert!(url.contains("state=user-42"));
        assert!(url.contains(
            "redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fapi%2Fintegrations%2Fhubspot%2Fcallback"
        ));
    }

    #[test]
    fn missing_client_id_is_a_configuration_error() {
        let err = client(test_config("", "my-secret"))
            .authorization_url("user-42")
            .unwrap_err();
        assert!(matches!(err, OAuthError::Configuration(_)));
    }

    #[test]
    fn missing_client_secret_is_a_configuration_error() {
        let err = client(test_config("my-client", ""))
            .authorization_url("user-42")
            .unwrap_err();
        assert!(matches!(err, OAuthError::Configuration(_)));
    }
}
