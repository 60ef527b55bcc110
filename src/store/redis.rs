// ABOUTME: Redis credential storage backend with connection pooling
// ABOUTME: Persists one hash of string fields per user with a 30-day TTL
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use super::{backend::StorageBackend, Credentials, StoreError};
use crate::config::StoreConfig;
use crate::constants::storage;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;
use std::collections::HashMap;
use std::time::Duration;
use tracing::{error, info};

/// Redis-backed credential storage (primary tier)
///
/// Uses `ConnectionManager` for automatic reconnection. Each user's record
/// is a Redis hash under `hubspot:{user_id}` so individual fields stay
/// inspectable; the per-key write is atomic, which is the only concurrency
/// guarantee this store provides.
#[derive(Clone)]
pub struct RedisStore {
    manager: ConnectionManager,
}

impl RedisStore {
    /// Connect to Redis and verify the connection with a PING
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created or the initial
    /// connection fails within the configured timeout.
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        info!(
            "Connecting to Redis at {} (timeout={}s, response_timeout={}s)",
            config.redis_url, config.connection_timeout_secs, config.response_timeout_secs
        );

        let client = redis::Client::open(config.redis_url.as_str())
            .map_err(|e| StoreError::Backend(format!("failed to create Redis client: {e}")))?;

        let manager_config = ConnectionManagerConfig::new()
            .set_connection_timeout(Duration::from_secs(config.connection_timeout_secs))
            .set_response_timeout(Duration::from_secs(config.response_timeout_secs));

        let manager = ConnectionManager::new_with_config(client, manager_config)
            .await
            .map_err(|e| StoreError::Backend(format!("Redis connection failed: {e}")))?;

        let store = Self { manager };
        store.ping().await?;
        info!("Successfully connected to Redis");
        Ok(store)
    }

    /// Build the namespaced Redis key for a user
    fn build_key(user_id: &str) -> String {
        format!("{}{user_id}", storage::KEY_PREFIX)
    }
}

#[async_trait::async_trait]
impl StorageBackend for RedisStore {
    async fn save(&self, user_id: &str, credentials: &Credentials) -> Result<(), StoreError> {
        let key = Self::build_key(user_id);
        let fields = credentials.to_fields();
        let mut conn = self.manager.clone();

        // DEL before HSET so the record is replaced, never merged with
        // stale fields from a previous grant
        let ttl_secs = i64::try_from(storage::CREDENTIAL_TTL_SECS).unwrap_or(i64::MAX);
        let _: () = redis::pipe()
            .atomic()
            .del(&key)
            .ignore()
            .hset_multiple(&key, &fields)
            .ignore()
            .expire(&key, ttl_secs)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                error!("Redis save failed for user {user_id}: {e}");
                StoreError::Backend(format!("Redis save failed: {e}"))
            })?;

        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<Credentials>, StoreError> {
        let key = Self::build_key(user_id);
        let mut conn = self.manager.clone();

        let fields: HashMap<String, String> = conn.hgetall(&key).await.map_err(|e| {
            error!("Redis load failed for user {user_id}: {e}");
            StoreError::Backend(format!("Redis load failed: {e}"))
        })?;

        if fields.is_empty() {
            return Ok(None);
        }

        Credentials::from_fields(&fields).map(Some)
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let key = Self::build_key(user_id);
        let mut conn = self.manager.clone();

        let removed: i64 = conn.del(&key).await.map_err(|e| {
            error!("Redis delete failed for user {user_id}: {e}");
            StoreError::Backend(format!("Redis delete failed: {e}"))
        })?;

        Ok(removed > 0)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();

        let response: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| StoreError::Backend(format!("Redis PING failed: {e}")))?;

        if response == "PONG" {
            Ok(())
        } else {
            Err(StoreError::Backend(format!(
                "unexpected PING response '{response}'"
            )))
        }
    }
}
