// ABOUTME: Unit tests for the two-tier credential store
// ABOUTME: Covers round-trips, whole-record overwrite, and tier selection rules
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 HubSpot Bridge Contributors

use hubspot_bridge::store::{
    backend::StorageBackend, memory::MemoryStore, CredentialStore, Credentials, StoreError,
};

fn sample_credentials() -> Credentials {
    Credentials {
        access_token: "tok1".to_owned(),
        refresh_token: Some("ref1".to_owned()),
        expires_in: 1800,
        token_type: "bearer".to_owned(),
        scope: "crm.objects.contacts.read".to_owned(),
    }
}

#[tokio::test]
async fn load_returns_absent_for_unknown_user() {
    let store = CredentialStore::in_memory();
    let record = store.load("never-exchanged").await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn save_then_load_round_trips() {
    let store = CredentialStore::in_memory();
    let creds = sample_credentials();

    store.save("user-1", &creds).await.unwrap();
    let loaded = store.load("user-1").await.unwrap();
    assert_eq!(loaded, Some(creds));
}

#[tokio::test]
async fn save_overwrites_record_entirely() {
    let store = CredentialStore::in_memory();
    store.save("user-1", &sample_credentials()).await.unwrap();

    // New grant without a refresh token must not keep the old one around
    let replacement = Credentials {
        access_token: "tok2".to_owned(),
        refresh_token: None,
        expires_in: 21_600,
        token_type: "bearer".to_owned(),
        scope: "crm.objects.contacts.read".to_owned(),
    };
    store.save("user-1", &replacement).await.unwrap();

    let loaded = store.load("user-1").await.unwrap().unwrap();
    assert_eq!(loaded.access_token, "tok2");
    assert_eq!(loaded.refresh_token, None);
}

#[tokio::test]
async fn save_is_idempotent() {
    let store = CredentialStore::in_memory();
    let creds = sample_credentials();

    store.save("user-1", &creds).await.unwrap();
    store.save("user-1", &creds).await.unwrap();

    assert_eq!(store.load("user-1").await.unwrap(), Some(creds));
}

#[tokio::test]
async fn users_do_not_interact() {
    let store = CredentialStore::in_memory();
    store.save("user-1", &sample_credentials()).await.unwrap();

    assert!(store.load("user-2").await.unwrap().is_none());
}

#[tokio::test]
async fn delete_requires_the_primary_tier() {
    // The fallback tier is a development convenience; deletion goes
    // through the primary only and reports unavailable without one
    let store = CredentialStore::in_memory();
    store.save("user-1", &sample_credentials()).await.unwrap();

    assert!(matches!(
        store.delete("user-1").await,
        Err(StoreError::Unavailable)
    ));
}

#[tokio::test]
async fn health_is_false_without_a_primary() {
    let store = CredentialStore::in_memory();
    assert!(!store.health().await);
}

#[tokio::test]
async fn memory_backend_delete_reports_whether_a_record_existed() {
    let backend = MemoryStore::new();

    assert!(!backend.delete("user-1").await.unwrap());

    backend.save("user-1", &sample_credentials()).await.unwrap();
    assert!(backend.delete("user-1").await.unwrap());
    assert!(backend.load("user-1").await.unwrap().is_none());
}
