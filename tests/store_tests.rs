//! Integration tests for the credential store: persistence, owner
//! scoping and the encrypted-at-rest guarantee.

use std::fs;
use std::path::PathBuf;

use credvault::crypto::kdf::KdfParams;
use credvault::crypto::{Envelope, EnvelopeCodec};
use credvault::errors::CredVaultError;
use credvault::vault::{CredentialStore, CredentialUpdate, NewCredential};
use tempfile::TempDir;

/// Helper: a store path inside a fresh temp dir.
fn store_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("credentials.json");
    (dir, path)
}

fn codec() -> EnvelopeCodec {
    EnvelopeCodec::with_params("integration-secret", KdfParams { iterations: 1_000 })
}

fn credential(site: &str, username: &str, password: &str) -> NewCredential {
    NewCredential {
        site_name: site.into(),
        username: username.into(),
        password: password.into(),
        ..Default::default()
    }
}

#[test]
fn records_survive_save_and_reopen() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).expect("create");
    let added = store
        .add(
            "alice",
            NewCredential {
                site_name: "GitHub".into(),
                site_url: Some("https://github.com".into()),
                username: "alice@example.com".into(),
                password: "MyS3cret!".into(),
                notes: Some("2FA enabled".into()),
                category: Some("work".into()),
            },
            &codec,
        )
        .expect("add");
    store.save().expect("save");

    let reopened = CredentialStore::open(&path).expect("open");
    let view = reopened.get("alice", added.id, &codec).expect("get");
    assert_eq!(view.site_name, "GitHub");
    assert_eq!(view.site_url.as_deref(), Some("https://github.com"));
    assert_eq!(view.username, "alice@example.com");
    assert_eq!(view.password, "MyS3cret!");
    assert_eq!(view.notes.as_deref(), Some("2FA enabled"));
    assert_eq!(view.category.as_deref(), Some("work"));
    assert_eq!(view.created_at, added.created_at);
}

#[test]
fn plaintext_never_reaches_the_file() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).unwrap();
    store
        .add("alice", credential("Bank", "alice", "VeryDistinctivePassword42"), &codec)
        .unwrap();
    store.save().unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    assert!(!raw.contains("VeryDistinctivePassword42"));

    let record = store.record("alice", 1).unwrap();
    assert!(record.password.parse::<Envelope>().is_ok());
    assert!(raw.contains(&record.password));
}

#[test]
fn ids_keep_increasing_across_reopen_and_delete() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).unwrap();
    let first = store.add("alice", credential("A", "a", "pw"), &codec).unwrap();
    let second = store.add("alice", credential("B", "b", "pw"), &codec).unwrap();
    store.delete("alice", second.id).unwrap();
    store.save().unwrap();

    let mut reopened = CredentialStore::open(&path).unwrap();
    let third = reopened.add("alice", credential("C", "c", "pw"), &codec).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(third.id, 3);
}

#[test]
fn other_owners_records_are_invisible() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).unwrap();
    let alice = store.add("alice", credential("GitHub", "alice", "pw-a"), &codec).unwrap();
    store.add("bob", credential("GitLab", "bob", "pw-b"), &codec).unwrap();
    store.save().unwrap();

    let mut store = CredentialStore::open(&path).unwrap();
    assert!(matches!(
        store.get("bob", alice.id, &codec),
        Err(CredVaultError::CredentialNotFound(_))
    ));
    assert!(matches!(
        store.delete("bob", alice.id),
        Err(CredVaultError::CredentialNotFound(_))
    ));
    let bob_list = store.list("bob", &codec).unwrap();
    assert_eq!(bob_list.len(), 1);
    assert_eq!(bob_list[0].site_name, "GitLab");

    assert!(store.search("bob", "git", &codec).unwrap().len() == 1);
    assert_eq!(store.get("alice", alice.id, &codec).unwrap().password, "pw-a");
}

#[test]
fn list_and_search_order_by_site_name() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).unwrap();
    for site in ["twitter", "Amazon", "github", "Bank"] {
        store.add("alice", credential(site, "x", "pw"), &codec).unwrap();
    }

    let names: Vec<String> = store
        .list("alice", &codec)
        .unwrap()
        .into_iter()
        .map(|v| v.site_name)
        .collect();
    assert_eq!(names, ["Amazon", "Bank", "github", "twitter"]);

    let found: Vec<String> = store
        .search("alice", "A", &codec)
        .unwrap()
        .into_iter()
        .map(|v| v.site_name)
        .collect();
    assert_eq!(found, ["Amazon", "Bank"]);
}

#[test]
fn update_reseals_password_and_persists() {
    let (_dir, path) = store_path();
    let codec = codec();

    let mut store = CredentialStore::create(&path).unwrap();
    let added = store.add("alice", credential("GitHub", "alice", "old"), &codec).unwrap();
    let old_envelope = store.record("alice", added.id).unwrap().password.clone();

    store
        .update(
            "alice",
            added.id,
            CredentialUpdate {
                password: Some("new".into()),
                category: Some("personal".into()),
                ..Default::default()
            },
            &codec,
        )
        .unwrap();
    store.save().unwrap();

    let reopened = CredentialStore::open(&path).unwrap();
    let view = reopened.get("alice", added.id, &codec).unwrap();
    assert_eq!(view.password, "new");
    assert_eq!(view.category.as_deref(), Some("personal"));
    assert_ne!(reopened.record("alice", added.id).unwrap().password, old_envelope);
}

#[test]
fn wrong_secret_cannot_read_store() {
    let (_dir, path) = store_path();

    let mut store = CredentialStore::create(&path).unwrap();
    store.add("alice", credential("GitHub", "alice", "pw"), &codec()).unwrap();
    store.save().unwrap();

    let wrong = EnvelopeCodec::with_params("not-the-secret", KdfParams { iterations: 1_000 });
    let store = CredentialStore::open(&path).unwrap();
    assert!(matches!(
        store.get("alice", 1, &wrong),
        Err(CredVaultError::AuthenticationFailure)
    ));
    assert!(matches!(
        store.list("alice", &wrong),
        Err(CredVaultError::AuthenticationFailure)
    ));
}

#[test]
fn open_missing_store_fails() {
    let (_dir, path) = store_path();
    assert!(matches!(
        CredentialStore::open(&path),
        Err(CredVaultError::StoreNotFound(_))
    ));
}

#[test]
fn create_refuses_existing_store() {
    let (_dir, path) = store_path();
    CredentialStore::create(&path).unwrap();
    assert!(matches!(
        CredentialStore::create(&path),
        Err(CredVaultError::StoreAlreadyExists(_))
    ));
}

#[test]
fn corrupted_store_file_is_rejected() {
    let (_dir, path) = store_path();
    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(
        CredentialStore::open(&path),
        Err(CredVaultError::InvalidStoreFormat(_))
    ));
}

#[test]
fn failed_update_under_wrong_secret_keeps_password_readable() {
    let (_dir, path) = store_path();
    let good = codec();
    let typo = EnvelopeCodec::with_params("integration-secreT", KdfParams { iterations: 1_000 });

    let mut store = CredentialStore::create(&path).unwrap();
    let added = store.add("alice", credential("Bank", "alice", "original"), &good).unwrap();

    for update in [
        CredentialUpdate {
            username: Some("changed".into()),
            ..Default::default()
        },
        CredentialUpdate {
            password: Some("replacement".into()),
            ..Default::default()
        },
    ] {
        assert!(matches!(
            store.update("alice", added.id, update, &typo),
            Err(CredVaultError::AuthenticationFailure)
        ));
    }
    store.save().unwrap();

    let reopened = CredentialStore::open(&path).unwrap();
    let view = reopened.get("alice", added.id, &good).unwrap();
    assert_eq!(view.username, "alice");
    assert_eq!(view.password, "original");
}
