use crate::canonical::ObjectKey;
use crate::store::{FsStore, ObjectStore, StoreError, fingerprint};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::{TempDir, tempdir};

fn bucket() -> (TempDir, FsStore) {
    let dir = tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("dir")).unwrap();
    fs::write(root.join("a b.txt"), "spaced").unwrap();
    fs::write(root.join("dir/report.json"), "{}").unwrap();
    fs::write(root.join("custom.bin"), "custom").unwrap();
    fs::write(
        root.join("custom.bin.meta.json"),
        r#"{ "content_type": "application/x-custom", "cache_control": "public, max-age=60" }"#,
    )
    .unwrap();

    let store = FsStore::new(root);
    (dir, store)
}

#[tokio::test]
async fn head_finds_files_with_decoded_names() {
    // Arrange
    let (_dir, store) = bucket();

    // Act
    let spaced = store.head(&ObjectKey::from("a b.txt")).await.unwrap();
    let encoded = store.head(&ObjectKey::from("a%20b.txt")).await.unwrap();

    // Assert
    assert!(spaced);
    assert!(!encoded);
}

#[tokio::test]
async fn head_treats_directories_as_absent() {
    let (_dir, store) = bucket();

    assert!(!store.head(&ObjectKey::from("dir")).await.unwrap());
}

#[tokio::test]
async fn head_through_a_file_is_absent() {
    let (_dir, store) = bucket();

    assert!(!store.head(&ObjectKey::from("a b.txt/x")).await.unwrap());
}

#[tokio::test]
async fn get_guesses_content_type_and_fingerprints_body() {
    // Arrange
    let (_dir, store) = bucket();

    // Act
    let object = store
        .get(&ObjectKey::from("dir/report.json"))
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(&object.body[..], b"{}");
    assert_eq!(
        object.metadata.content_type.as_deref(),
        Some("application/json")
    );
    assert_eq!(object.metadata.cache_control, None);
    assert_eq!(object.etag, fingerprint(b"{}"));
    assert!(object.uploaded.is_some());
}

#[tokio::test]
async fn get_reads_sidecar_metadata() {
    // Arrange
    let (_dir, store) = bucket();

    // Act
    let object = store
        .get(&ObjectKey::from("custom.bin"))
        .await
        .unwrap()
        .unwrap();

    // Assert
    assert_eq!(
        object.metadata.content_type.as_deref(),
        Some("application/x-custom")
    );
    assert_eq!(
        object.metadata.cache_control.as_deref(),
        Some("public, max-age=60")
    );
}

#[tokio::test]
async fn sidecar_files_are_not_objects() {
    let (_dir, store) = bucket();

    let object = store
        .get(&ObjectKey::from("custom.bin.meta.json"))
        .await
        .unwrap();

    assert!(object.is_none());
}

#[tokio::test]
async fn invalid_sidecar_is_an_error() {
    // Arrange
    let (dir, store) = bucket();
    fs::write(dir.path().join("broken.txt"), "x").unwrap();
    fs::write(dir.path().join("broken.txt.meta.json"), "{ not json").unwrap();

    // Act
    let result = store.get(&ObjectKey::from("broken.txt")).await;

    // Assert
    assert!(matches!(result, Err(StoreError::InvalidMetadata { .. })));
}

#[tokio::test]
async fn traversal_keys_are_absent() {
    // Arrange
    let (dir, _) = bucket();
    let inner = dir.path().join("inner");
    fs::create_dir_all(&inner).unwrap();
    let store = FsStore::new(&inner);

    // Act / Assert
    for key in ["../a b.txt", "./x", "a//b", "", "/etc/passwd"] {
        assert!(
            store.get(&ObjectKey::from(key)).await.unwrap().is_none(),
            "key {key:?} should not resolve"
        );
    }
}
