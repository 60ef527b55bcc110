// ABOUTME: Credential record type and two-tier credential store
// ABOUTME: Redis primary with transparent in-memory fallback on operational failure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

//! # Credential Store
//!
//! Key-value persistence for per-user OAuth credentials. A record exists
//! for a user id iff that user completed at least one successful code
//! exchange and was not explicitly deleted. Records are overwritten whole
//! on refresh, never merged.
//!
//! The store runs two tiers: a Redis primary and an in-memory fallback.
//! The fallback is consulted only when the primary is unreachable - a
//! reachable-but-empty primary means the credential is genuinely absent.
//! The tiers are never merged.

/// Storage backend trait
pub mod backend;
/// In-memory fallback backend
pub mod memory;
/// Redis primary backend
pub mod redis;

use crate::config::StoreConfig;
use crate::constants::hubspot;
use self::backend::StorageBackend;
use self::memory::MemoryStore;
use self::redis::RedisStore;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::warn;

/// Credential store error types
#[derive(Debug, Error)]
pub enum StoreError {
    /// The primary store is not reachable and the operation requires it
    #[error("primary credential store is unavailable")]
    Unavailable,

    /// The backing store reported an operational failure
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A persisted record could not be decoded into a credential
    #[error("invalid credential record: {0}")]
    InvalidRecord(String),
}

/// Per-user OAuth credential record
///
/// `expires_in` is advisory only: expiry is discovered reactively through
/// a failed API call, never through a timer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Opaque bearer token for resource API calls
    pub access_token: String,
    /// Longer-lived token used to obtain a new access token
    pub refresh_token: Option<String>,
    /// Advisory access token lifetime in seconds
    pub expires_in: i64,
    /// Token type, normally "bearer"
    pub token_type: String,
    /// Space-delimited granted permissions
    pub scope: String,
}

impl Credentials {
    /// Serialize to string field pairs for hash-style storage
    ///
    /// All values are stored as strings; `refresh_token` is omitted when
    /// absent rather than written as an empty marker.
    #[must_use]
    pub fn to_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            ("access_token".to_owned(), self.access_token.clone()),
            ("expires_in".to_owned(), self.expires_in.to_string()),
            ("token_type".to_owned(), self.token_type.clone()),
            ("scope".to_owned(), self.scope.clone()),
        ];
        if let Some(refresh) = &self.refresh_token {
            fields.push(("refresh_token".to_owned(), refresh.clone()));
        }
        fields
    }

    /// Decode from string field pairs, applying defaults for optional fields
    ///
    /// `access_token` is required; a record without it is invalid rather
    /// than silently empty. A missing or malformed `expires_in` falls back
    /// to the provider default instead of zero.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when `access_token` is missing
    /// or empty.
    pub fn from_fields(fields: &HashMap<String, String>) -> Result<Self, StoreError> {
        let access_token = fields
            .get("access_token")
            .filter(|token| !token.is_empty())
            .ok_or_else(|| StoreError::InvalidRecord("missing access_token".to_owned()))?
            .clone();

        let expires_in = fields
            .get("expires_in")
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(hubspot::DEFAULT_EXPIRES_IN_SECS);

        Ok(Self {
            access_token,
            refresh_token: fields.get("refresh_token").cloned(),
            expires_in,
            token_type: fields
                .get("token_type")
                .cloned()
                .unwrap_or_else(|| hubspot::DEFAULT_TOKEN_TYPE.to_owned()),
            scope: fields
                .get("scope")
                .cloned()
                .unwrap_or_else(|| hubspot::REQUESTED_SCOPE.to_owned()),
        })
    }
}

/// Two-tier credential store: Redis primary, in-memory fallback
///
/// Constructed once at process start and shared by reference with every
/// component that needs it. Concurrent refreshes for the same user may
/// overwrite each other (last write wins); the per-key atomicity of the
/// backend is the only guarantee here.
pub struct CredentialStore {
    primary: Option<RedisStore>,
    fallback: MemoryStore,
}

impl CredentialStore {
    /// Build a store over an already-connected primary backend
    #[must_use]
    pub fn new(primary: Option<RedisStore>) -> Self {
        Self {
            primary,
            fallback: MemoryStore::new(),
        }
    }

    /// Build a memory-only store (development and tests)
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Connect to the configured Redis primary, falling back to memory-only
    /// operation when the connection cannot be established
    pub async fn connect(config: &StoreConfig) -> Self {
        match RedisStore::connect(config).await {
            Ok(primary) => Self::new(Some(primary)),
            Err(e) => {
                warn!("Redis not available: {e}");
                warn!("Falling back to in-memory credential storage for development");
                Self::new(None)
            }
        }
    }

    /// Idempotent upsert of a user's credential record
    ///
    /// Tries the primary first; on operational failure the record lands in
    /// the fallback tier and the caller never observes the failure.
    ///
    /// # Errors
    ///
    /// Returns an error only when both tiers fail.
    pub async fn save(&self, user_id: &str, credentials: &Credentials) -> Result<(), StoreError> {
        if let Some(primary) = &self.primary {
            match primary.save(user_id, credentials).await {
                Ok(()) => {
                    tracing::debug!("Saved credentials to Redis for user {user_id}");
                    return Ok(());
                }
                Err(e) => {
                    warn!("Primary store save failed for user {user_id}: {e}");
                    warn!("Falling back to in-memory storage");
                }
            }
        }
        self.fallback.save(user_id, credentials).await
    }

    /// Load a user's credential record
    ///
    /// Reads the primary when reachable. A reachable-but-empty primary
    /// returns `None` without consulting the fallback; only a primary
    /// operational failure (or no primary at all) reaches the fallback tier.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidRecord`] when the stored record cannot
    /// be decoded.
    pub async fn load(&self, user_id: &str) -> Result<Option<Credentials>, StoreError> {
        if let Some(primary) = &self.primary {
            match primary.load(user_id).await {
                Ok(record) => return Ok(record),
                Err(e @ StoreError::InvalidRecord(_)) => return Err(e),
                Err(e) => {
                    warn!("Primary store load failed for user {user_id}: {e}");
                    warn!("Consulting in-memory fallback");
                }
            }
        }
        self.fallback.load(user_id).await
    }

    /// Delete a user's credential record from the primary store
    ///
    /// The fallback tier is a development convenience and is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Unavailable`] when no primary store is
    /// reachable.
    pub async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let Some(primary) = &self.primary else {
            return Err(StoreError::Unavailable);
        };
        primary.delete(user_id).await
    }

    /// Report whether the primary store is currently reachable
    pub async fn health(&self) -> bool {
        match &self.primary {
            Some(primary) => primary.ping().await.is_ok(),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Credentials {
        Credentials {
            access_token: "tok1".to_owned(),
            refresh_token: Some("ref1".to_owned()),
            expires_in: 1800,
            token_type: "bearer".to_owned(),
            scope: "crm.objects.contacts.read".to_owned(),
        }
    }

    #[test]
    fn fields_round_trip_preserves_record() {
        let creds = sample();
        let fields: HashMap<String, String> = creds.to_fields().into_iter().collect();
        let decoded = Credentials::from_fields(&fields).unwrap();
        assert_eq!(decoded, creds);
    }

    #[test]
    fn expires_in_survives_string_representation() {
        let fields: HashMap<String, String> = sample().to_fields().into_iter().collect();
        assert_eq!(fields.get("expires_in").map(String::as_str), Some("1800"));
        let decoded = Credentials::from_fields(&fields).unwrap();
        assert_eq!(decoded.expires_in, 1800);
    }

    #[test]
    fn missing_optional_fields_get_defaults() {
        let mut fields = HashMap::new();
        fields.insert("access_token".to_owned(), "tok".to_owned());
        let decoded = Credentials::from_fields(&fields).unwrap();
        assert_eq!(decoded.refresh_token, None);
        assert_eq!(decoded.expires_in, 21_600);
        assert_eq!(decoded.token_type, "bearer");
        assert_eq!(decoded.scope, "crm.objects.contacts.read");
    }

    #[test]
    fn malformed_expires_in_falls_back_to_default() {
        let mut fields = HashMap::new();
        fields.insert("access_token".to_owned(), "tok".to_owned());
        fields.insert("expires_in".to_owned(), "not-a-number".to_owned());
        let decoded = Credentials::from_fields(&fields).unwrap();
        assert_eq!(decoded.expires_in, 21_600);
    }

    #[test]
    fn missing_access_token_is_invalid() {
        let mut fields = HashMap::new();
        fields.insert("refresh_token".to_owned(), "ref".to_owned());
        assert!(matches!(
            Credentials::from_fields(&fields),
            Err(StoreError::InvalidRecord(_))
        ));
    }
}
