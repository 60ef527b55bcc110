// ABOUTME: In-memory credential storage used as the development fallback tier
// ABOUTME: Plain map behind a RwLock; no TTL, no persistence across restarts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use super::{backend::StorageBackend, Credentials, StoreError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory credential storage (fallback tier)
///
/// Exists so the bridge stays usable without a live Redis instance during
/// development. Not a durability guarantee: records vanish on restart and
/// the 30-day storage TTL is not enforced here.
#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Credentials>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StorageBackend for MemoryStore {
    async fn save(&self, user_id: &str, credentials: &Credentials) -> Result<(), StoreError> {
        let mut entries = self.entries.write().await;
        entries.insert(user_id.to_owned(), credentials.clone());
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<Credentials>, StoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(user_id).cloned())
    }

    async fn delete(&self, user_id: &str) -> Result<bool, StoreError> {
        let mut entries = self.entries.write().await;
        Ok(entries.remove(user_id).is_some())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
