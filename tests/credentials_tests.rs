//! Credential store integration tests

mod common;

use lectern::models::Role;
use lectern::services::credentials::verify_password;
use uuid::Uuid;

#[tokio::test]
async fn create_with_password_stores_a_verifiable_credential() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Pat Keeper", "3B", Some("s3cret"), Role::Leader)
        .await
        .unwrap();

    let identity = services.credentials.get(id).await.unwrap().unwrap();
    assert!(identity.has_credential());

    let hash = identity.password_hash.as_deref().unwrap();
    let salt = identity.password_salt.as_deref().unwrap();
    assert!(verify_password(hash, salt, "s3cret"));
    assert!(!verify_password(hash, salt, "S3cret"));
    assert!(!verify_password(hash, salt, ""));
}

#[tokio::test]
async fn create_without_password_stores_no_credential() {
    let (_repository, services) = common::setup().await;
    for password in [None, Some("")] {
        let id = services
            .credentials
            .create("No Password", "3B", password, Role::Student)
            .await
            .unwrap();
        let identity = services.credentials.get(id).await.unwrap().unwrap();
        assert!(!identity.has_credential());
        assert!(identity.password_hash.is_none());
        assert!(identity.password_salt.is_none());
    }
}

#[tokio::test]
async fn set_password_regenerates_the_salt() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Sam Salt", "3B", Some("first"), Role::Student)
        .await
        .unwrap();
    let before = services.credentials.get(id).await.unwrap().unwrap();

    assert!(services.credentials.set_password(id, "second").await.unwrap());
    let after = services.credentials.get(id).await.unwrap().unwrap();

    assert_ne!(before.password_salt, after.password_salt);
    let hash = after.password_hash.as_deref().unwrap();
    let salt = after.password_salt.as_deref().unwrap();
    assert!(verify_password(hash, salt, "second"));
    assert!(!verify_password(hash, salt, "first"));
}

#[tokio::test]
async fn set_password_overwrites_the_no_credential_state() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Was Open", "3B", None, Role::Student)
        .await
        .unwrap();

    assert!(services.credentials.set_password(id, "now-locked").await.unwrap());
    let identity = services.credentials.get(id).await.unwrap().unwrap();
    assert!(identity.has_credential());

    // Unknown id is a plain rejection.
    assert!(!services
        .credentials
        .set_password(Uuid::new_v4(), "x")
        .await
        .unwrap());
}

#[tokio::test]
async fn update_details_leaves_the_credential_untouched() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Old Name", "3B", Some("keepme"), Role::Student)
        .await
        .unwrap();

    assert!(services
        .credentials
        .update_details(id, "New Name", "4A", Role::Leader)
        .await
        .unwrap());

    let identity = services.credentials.get(id).await.unwrap().unwrap();
    assert_eq!(identity.display_name, "New Name");
    assert_eq!(identity.group_tag, "4A");
    assert_eq!(identity.role, Role::Leader);
    let hash = identity.password_hash.as_deref().unwrap();
    let salt = identity.password_salt.as_deref().unwrap();
    assert!(verify_password(hash, salt, "keepme"));

    assert!(!services
        .credentials
        .update_details(Uuid::new_v4(), "X", "Y", Role::Student)
        .await
        .unwrap());
}

#[tokio::test]
async fn delete_removes_the_identity() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Short Lived", "3B", None, Role::Student)
        .await
        .unwrap();

    assert!(services.credentials.delete(id).await.unwrap());
    assert!(services.credentials.get(id).await.unwrap().is_none());
    assert!(!services.credentials.delete(id).await.unwrap());
}

#[tokio::test]
async fn list_filters_by_group_and_role() {
    let (_repository, services) = common::setup().await;
    services
        .credentials
        .create("A", "3B", None, Role::Student)
        .await
        .unwrap();
    services
        .credentials
        .create("B", "3B", None, Role::Leader)
        .await
        .unwrap();
    services
        .credentials
        .create("C", "4A", None, Role::Student)
        .await
        .unwrap();

    assert_eq!(services.credentials.list(None, None).await.unwrap().len(), 3);
    assert_eq!(
        services
            .credentials
            .list(Some("3B"), None)
            .await
            .unwrap()
            .len(),
        2
    );
    assert_eq!(
        services
            .credentials
            .list(None, Some(Role::Student))
            .await
            .unwrap()
            .len(),
        2
    );
    let both = services
        .credentials
        .list(Some("3B"), Some(Role::Leader))
        .await
        .unwrap();
    assert_eq!(both.len(), 1);
    assert_eq!(both[0].display_name, "B");
}

#[tokio::test]
async fn is_leader_only_for_the_leader_role() {
    let (_repository, services) = common::setup().await;
    let leader = services
        .credentials
        .create("Lead", "3B", None, Role::Leader)
        .await
        .unwrap();
    let admin = services
        .credentials
        .create("Admin", "Staff", None, Role::Admin)
        .await
        .unwrap();
    let student = services
        .credentials
        .create("Stu", "3B", None, Role::Student)
        .await
        .unwrap();

    assert!(services.credentials.is_leader(leader).await.unwrap());
    assert!(!services.credentials.is_leader(admin).await.unwrap());
    assert!(!services.credentials.is_leader(student).await.unwrap());
    assert!(!services.credentials.is_leader(Uuid::new_v4()).await.unwrap());
}

#[tokio::test]
async fn rename_group_moves_every_member() {
    let (_repository, services) = common::setup().await;
    let a = services
        .credentials
        .create("A", "3A", None, Role::Student)
        .await
        .unwrap();
    let b = services
        .credentials
        .create("B", "3A", None, Role::Student)
        .await
        .unwrap();

    assert!(services.credentials.rename_group("3A", "3C").await.unwrap());
    for id in [a, b] {
        let identity = services.credentials.get(id).await.unwrap().unwrap();
        assert_eq!(identity.group_tag, "3C");
    }
}

#[tokio::test]
async fn rename_group_rejects_bad_inputs() {
    let (_repository, services) = common::setup().await;
    services
        .credentials
        .create("A", "3A", None, Role::Student)
        .await
        .unwrap();

    // Empty or whitespace target, regardless of usage.
    assert!(!services.credentials.rename_group("3A", "").await.unwrap());
    assert!(!services.credentials.rename_group("3A", "   ").await.unwrap());
    // Same tag.
    assert!(!services.credentials.rename_group("3A", "3A").await.unwrap());
    // Unused old tag.
    assert!(!services.credentials.rename_group("9Z", "3C").await.unwrap());
}

#[tokio::test]
async fn points_accumulate_and_floor_at_zero() {
    let (_repository, services) = common::setup().await;
    let id = services
        .credentials
        .create("Scorer", "3B", None, Role::Student)
        .await
        .unwrap();

    assert!(services.credentials.add_points(id, 10).await.unwrap());
    assert_eq!(services.credentials.get(id).await.unwrap().unwrap().points, 10);

    assert!(services.credentials.add_points(id, -50).await.unwrap());
    assert_eq!(services.credentials.get(id).await.unwrap().unwrap().points, 0);
}

#[tokio::test]
async fn bootstrap_is_idempotent() {
    let (_repository, services) = common::setup().await;

    for _ in 0..3 {
        services.credentials.bootstrap().await.unwrap();
    }

    let admins = services
        .credentials
        .list(None, Some(Role::Admin))
        .await
        .unwrap();
    assert_eq!(admins.len(), 1);
    assert_eq!(admins[0].display_name, "Administrator");
    assert_eq!(admins[0].group_tag, "Staff");
    assert!(!admins[0].has_credential());
}
