// ABOUTME: HubSpot integration route handlers for the OAuth flow and contacts API
// ABOUTME: Authorize redirect, OAuth callback, contacts fetch, and disconnect
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! HubSpot integration routes
//!
//! - `GET /api/integrations/hubspot/authorize` - redirect to HubSpot's
//!   authorization page
//! - `GET /api/integrations/hubspot/callback` - exchange the callback code
//!   for tokens, then redirect back to the frontend
//! - `GET /api/integrations/hubspot/contacts` - fetch a page of contacts
//! - `DELETE /api/integrations/hubspot/credentials` - disconnect a user

use crate::contacts::ContactsError;
use crate::errors::AppError;
use crate::oauth::OAuthError;
use crate::server::ServerResources;
use crate::store::StoreError;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    routing::{delete, get},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

fn default_user_id() -> String {
    "test_user".to_owned()
}

/// Query parameters carrying a user id
#[derive(Debug, Deserialize)]
pub struct UserParams {
    /// User to operate on; defaults to the development user
    #[serde(default = "default_user_id")]
    pub user_id: String,
}

/// OAuth callback query parameters
#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    /// Authorization code from HubSpot
    pub code: Option<String>,
    /// State parameter carrying the user id
    #[serde(default = "default_user_id")]
    pub state: String,
    /// Error parameter set when the user denied authorization
    pub error: Option<String>,
}

/// Routes for the HubSpot integration
pub struct HubSpotRoutes;

impl HubSpotRoutes {
    /// Create all HubSpot integration routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/api/integrations/hubspot/authorize",
                get(Self::handle_authorize),
            )
            .route(
                "/api/integrations/hubspot/callback",
                get(Self::handle_callback),
            )
            .route(
                "/api/integrations/hubspot/contacts",
                get(Self::handle_contacts),
            )
            .route(
                "/api/integrations/hubspot/credentials",
                delete(Self::handle_disconnect),
            )
            .with_state(resources)
    }

    /// Initiate the authorization flow with a redirect to HubSpot
    async fn handle_authorize(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<UserParams>,
    ) -> Result<Response, AppError> {
        let url = resources
            .oauth
            .authorization_url(&params.user_id)
            .map_err(map_oauth_error)?;

        Ok(Redirect::temporary(&url).into_response())
    }

    /// Handle the OAuth callback: exchange the code, store tokens, and
    /// send the user back to the frontend
    ///
    /// When HubSpot reports an `error` the core is not invoked at all;
    /// the user is redirected back with an error marker. An exchange
    /// failure surfaces as a 400 carrying the provider's detail text.
    async fn handle_callback(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<CallbackParams>,
    ) -> Result<Response, AppError> {
        let frontend = &resources.config.frontend_url;

        if let Some(error) = &params.error {
            warn!(
                "OAuth authorization denied for user {}: {error}",
                params.state
            );
            let target = format!("{frontend}/?oauth_error=authorization_denied");
            return Ok(Redirect::temporary(&target).into_response());
        }

        let code = params
            .code
            .as_deref()
            .ok_or_else(|| AppError::missing_field("code"))?;

        resources
            .oauth
            .exchange_code(code, &params.state)
            .await
            .map_err(map_oauth_error)?;

        let target = format!(
            "{frontend}/?oauth_success=true&user_id={}",
            urlencoding::encode(&params.state)
        );
        info!("Redirecting user {} back to frontend", params.state);
        Ok(Redirect::temporary(&target).into_response())
    }

    /// Fetch a page of contacts for a user
    ///
    /// Fetch outcomes ride in the response body, not the HTTP status:
    /// the frontend contract is `{success, user_id, data}` where `data`
    /// is either the contacts page or `{error}` with a stable message.
    async fn handle_contacts(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<UserParams>,
    ) -> Result<Response, AppError> {
        let data = match resources.contacts.get_contacts(&params.user_id).await {
            Ok(page) => serde_json::to_value(&page)
                .map_err(|e| AppError::internal(format!("response serialization failed: {e}")))?,
            Err(ContactsError::Store(e)) => {
                return Err(AppError::storage(e.to_string()).with_source(e));
            }
            Err(e) => serde_json::json!({ "error": e.user_message() }),
        };

        Ok(Json(serde_json::json!({
            "success": true,
            "user_id": params.user_id,
            "data": data,
        }))
        .into_response())
    }

    /// Remove a user's stored credentials from the primary store
    async fn handle_disconnect(
        State(resources): State<Arc<ServerResources>>,
        Query(params): Query<UserParams>,
    ) -> Result<Response, AppError> {
        let deleted = match resources.store.delete(&params.user_id).await {
            Ok(deleted) => deleted,
            Err(StoreError::Unavailable) => {
                return Err(AppError::unavailable(
                    "credential store unavailable; cannot delete",
                ));
            }
            Err(e) => return Err(AppError::storage(e.to_string()).with_source(e)),
        };

        info!(
            "Disconnect for user {}: record {}",
            params.user_id,
            if deleted { "removed" } else { "not found" }
        );
        Ok(Json(serde_json::json!({
            "success": true,
            "user_id": params.user_id,
            "deleted": deleted,
        }))
        .into_response())
    }
}

/// Map OAuth client failures to HTTP-facing errors
fn map_oauth_error(error: OAuthError) -> AppError {
    match error {
        OAuthError::Configuration(detail) => AppError::config(detail),
        OAuthError::ExchangeFailed { body, .. } => {
            AppError::invalid_input(format!("Failed to exchange code for tokens: {body}"))
        }
        OAuthError::InvalidResponse(detail) => {
            AppError::external_service(format!("Invalid token response from HubSpot: {detail}"))
        }
        OAuthError::Network(detail) => {
            AppError::external_unavailable(format!("Network error during token exchange: {detail}"))
        }
        OAuthError::Store(e) => AppError::storage(e.to_string()).with_source(e),
    }
}
