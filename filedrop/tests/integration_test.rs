//! Integration tests for filedrop
//!
//! These tests verify end-to-end functionality including:
//! - Store and read-back of uploaded payloads
//! - Key generation and collection placement
//! - Public URL derivation
//! - Concurrent upload safety

use filedrop::config::UploadConfig;
use filedrop::services::UploadService;
use filedrop::storage::UploadStore;
use std::collections::HashSet;
use tempfile::TempDir;

/// Helper to create a test service with its own upload root
fn create_test_service(base_url: &str) -> (UploadService, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let config = UploadConfig {
        root: temp_dir.path().join("uploads"),
        base_url: base_url.to_string(),
    };
    (UploadService::new(config), temp_dir)
}

#[tokio::test]
async fn test_upload_roundtrip() {
    let (service, _temp) = create_test_service("https://cdn.example.com");
    service.initialize().await.unwrap();

    let payload = b"integration payload";
    let receipt = service.upload(payload, "report.pdf", None).await.unwrap();

    // Key carries the original extension and no directory prefix
    assert!(receipt.relative_path.ends_with(".pdf"));
    assert!(!receipt.relative_path.contains('/'));

    // Read back byte-for-byte
    let fetched = service.fetch(&receipt.relative_path).await.unwrap();
    assert_eq!(fetched, payload);

    // URL is base + mount + key
    assert_eq!(
        receipt.public_url,
        format!("https://cdn.example.com/uploads/{}", receipt.relative_path)
    );
}

#[tokio::test]
async fn test_suffix_matches_original_extension() {
    let (service, _temp) = create_test_service("https://cdn.example.com");
    service.initialize().await.unwrap();

    // The original extension is preserved verbatim, including its case
    let receipt = service.upload(b"img", "Photo.PNG", None).await.unwrap();
    assert!(
        receipt.relative_path.ends_with(".PNG"),
        "suffix does not match original extension: {}",
        receipt.relative_path
    );

    let receipt = service.upload(b"doc", "notes.md", None).await.unwrap();
    assert!(receipt.relative_path.ends_with(".md"));
}

#[tokio::test]
async fn test_collection_placement() {
    let (service, temp) = create_test_service("https://cdn.example.com");
    service.initialize().await.unwrap();

    let receipt = service
        .upload(b"avatar", "me.png", Some("avatars"))
        .await
        .unwrap();

    assert!(receipt.relative_path.starts_with("avatars/"));

    // The file physically lives under root/avatars
    let on_disk = temp
        .path()
        .join("uploads")
        .join(&receipt.relative_path);
    assert!(on_disk.is_file());
}

#[tokio::test]
async fn test_identical_uploads_never_overwrite() {
    let (service, _temp) = create_test_service("https://cdn.example.com");
    service.initialize().await.unwrap();

    let a = service.upload(b"same", "dup.txt", None).await.unwrap();
    let b = service.upload(b"same", "dup.txt", None).await.unwrap();

    assert_ne!(a.relative_path, b.relative_path);

    let keys = service.list().await.unwrap();
    assert_eq!(keys.len(), 2);
}

#[tokio::test]
async fn test_default_base_url_fallback() {
    let temp_dir = TempDir::new().unwrap();
    let config = UploadConfig {
        root: temp_dir.path().join("uploads"),
        ..UploadConfig::default()
    };
    let service = UploadService::new(config);

    assert_eq!(
        service.public_url("a/b.png"),
        "http://localhost:3001/uploads/a/b.png"
    );
}

#[tokio::test]
async fn test_concurrent_uploads() {
    let (service, _temp) = create_test_service("https://cdn.example.com");
    service.initialize().await.unwrap();

    let mut handles = Vec::new();
    for i in 0..100 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            let payload = format!("payload number {}", i).into_bytes();
            let receipt = service
                .upload(&payload, "burst.bin", Some("burst"))
                .await
                .unwrap();
            (receipt.relative_path, payload)
        }));
    }

    let mut keys = HashSet::new();
    for handle in handles {
        let (key, payload) = handle.await.unwrap();

        // Every upload lands intact under its own key
        let fetched = service.fetch(&key).await.unwrap();
        assert_eq!(fetched, payload);

        assert!(keys.insert(key), "duplicate key generated");
    }

    assert_eq!(keys.len(), 100);
    assert_eq!(service.list().await.unwrap().len(), 100);
}

#[tokio::test]
async fn test_store_survives_reconstruction() {
    // A fresh store over the same root sees previously stored files
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("uploads");

    let store = UploadStore::new(root.clone());
    store.ensure_root().await.unwrap();
    let stored = store.store(b"persisted", "keep.txt", None).await.unwrap();

    let reopened = UploadStore::new(root);
    let read_back = reopened.read(&stored.relative_path).await.unwrap();
    assert_eq!(read_back, b"persisted");
}
