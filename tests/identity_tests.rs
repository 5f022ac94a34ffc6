mod common;

use memeforge::auth::ExternalIdentity;
use memeforge::{ForgeError, IdentityResolver};
use std::fs;

#[tokio::test]
async fn credential_roundtrip_and_rejections() {
    let (storage, path) = common::setup_storage("identity-creds").await;
    let resolver = IdentityResolver::new(storage.clone());

    let user = resolver
        .register("Ada", "ada@example.com", "hunter2", "http://pic.example/ada.png")
        .await
        .expect("register failed");

    let resolved = resolver
        .resolve_by_credentials("ada@example.com", "hunter2")
        .await
        .expect("login with correct credentials failed");
    assert_eq!(resolved, user);

    let err = resolver
        .resolve_by_credentials("ada@example.com", "wrong")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::InvalidCredentials));

    let err = resolver
        .resolve_by_credentials("nobody@example.com", "hunter2")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::InvalidCredentials));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn stored_credential_is_a_salted_hash() {
    let (storage, path) = common::setup_storage("identity-hash").await;
    let resolver = IdentityResolver::new(storage.clone());

    resolver
        .register("Ada", "ada@example.com", "hunter2", "")
        .await
        .expect("register failed");

    let stored = storage
        .user_by_email("ada@example.com")
        .await
        .expect("lookup failed")
        .expect("user missing")
        .password
        .expect("local account has no credential");
    assert!(stored.starts_with("$argon2"));
    assert_ne!(stored, "hunter2");

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
    let (storage, path) = common::setup_storage("identity-dup-email").await;
    let resolver = IdentityResolver::new(storage.clone());

    resolver
        .register("Ada", "ada@example.com", "hunter2", "")
        .await
        .expect("first register failed");

    let err = resolver
        .register("Imposter", "ada@example.com", "other", "")
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::EmailTaken));

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn unverified_assertion_creates_nothing() {
    let (storage, path) = common::setup_storage("identity-unverified").await;
    let resolver = IdentityResolver::new(storage.clone());

    let identity = ExternalIdentity {
        sub: "subject-1".to_string(),
        email: "ext@example.com".to_string(),
        email_verified: false,
        given_name: "Ext".to_string(),
        picture: String::new(),
    };
    let err = resolver
        .resolve_by_external_assertion(identity)
        .await
        .unwrap_err();
    assert!(matches!(err, ForgeError::UnverifiedEmail));

    let absent = storage
        .user_by_id("subject-1")
        .await
        .expect("lookup failed");
    assert!(absent.is_none());

    let _ = fs::remove_file(&path);
}

#[tokio::test]
async fn repeat_assertion_is_idempotent_on_identity() {
    let (storage, path) = common::setup_storage("identity-repeat").await;
    let resolver = IdentityResolver::new(storage.clone());

    let first = resolver
        .resolve_by_external_assertion(ExternalIdentity {
            sub: "subject-2".to_string(),
            email: "ext@example.com".to_string(),
            email_verified: true,
            given_name: "Ada".to_string(),
            picture: "http://pic.example/v1.png".to_string(),
        })
        .await
        .expect("first assertion failed");
    assert!(first.password.is_none());

    // Same subject with newer profile fields: identity resolves to the
    // stored record, which stays untouched.
    let second = resolver
        .resolve_by_external_assertion(ExternalIdentity {
            sub: "subject-2".to_string(),
            email: "renamed@example.com".to_string(),
            email_verified: true,
            given_name: "Adelaide".to_string(),
            picture: "http://pic.example/v2.png".to_string(),
        })
        .await
        .expect("second assertion failed");

    assert_eq!(second.id, first.id);
    assert_eq!(second.name, "Ada");
    assert_eq!(second.email, "ext@example.com");

    let renamed = storage
        .user_by_email("renamed@example.com")
        .await
        .expect("lookup failed");
    assert!(renamed.is_none());

    let _ = fs::remove_file(&path);
}
