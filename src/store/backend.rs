// ABOUTME: Storage backend trait for pluggable credential persistence tiers
// ABOUTME: Implemented by the Redis primary and the in-memory fallback
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use super::{Credentials, StoreError};

/// Backend contract for a single credential storage tier
///
/// Tier selection (primary vs fallback) lives in
/// [`CredentialStore`](super::CredentialStore); backends only know how to
/// persist one record per user id.
#[async_trait::async_trait]
pub trait StorageBackend: Send + Sync {
    /// Upsert the record for a user, overwriting any existing record entirely
    async fn save(&self, user_id: &str, credentials: &Credentials) -> Result<(), StoreError>;

    /// Load the record for a user; `None` when no record exists
    async fn load(&self, user_id: &str) -> Result<Option<Credentials>, StoreError>;

    /// Remove the record for a user; returns whether a record existed
    async fn delete(&self, user_id: &str) -> Result<bool, StoreError>;

    /// Verify the backend is reachable
    async fn ping(&self) -> Result<(), StoreError>;
}
