//! Upload service
//!
//! Coordinates the filesystem store with URL construction: stores the
//! payload under a generated key and hands back a receipt carrying the
//! relative key, derived public URL, and payload checksum.

use crate::config::{UploadConfig, UPLOAD_MOUNT};
use crate::error::Result;
use crate::storage::UploadStore;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Receipt for a completed upload
#[derive(Debug, Clone, Serialize)]
pub struct UploadReceipt {
    /// Storage key, relative to the upload root
    pub relative_path: String,
    /// URL the payload will be served from
    pub public_url: String,
    /// Payload size in bytes
    pub size: u64,
    /// Hex SHA-256 of the stored payload
    pub checksum: String,
}

/// Service for storing uploads and deriving public URLs
#[derive(Clone)]
pub struct UploadService {
    store: UploadStore,
    config: UploadConfig,
}

impl UploadService {
    pub fn new(config: UploadConfig) -> Self {
        let store = UploadStore::new(config.root.clone());
        Self { store, config }
    }

    /// Create the upload root if needed (idempotent)
    pub async fn initialize(&self) -> Result<()> {
        self.store.ensure_root().await
    }

    /// Store a payload and return its receipt
    pub async fn upload(
        &self,
        payload: &[u8],
        original_name: &str,
        collection: Option<&str>,
    ) -> Result<UploadReceipt> {
        tracing::info!(
            "Uploading: {} ({} bytes)",
            original_name,
            payload.len()
        );

        let stored = self.store.store(payload, original_name, collection).await?;
        let checksum = checksum_hex(payload);

        Ok(UploadReceipt {
            public_url: self.public_url(&stored.relative_path),
            relative_path: stored.relative_path,
            size: stored.size,
            checksum,
        })
    }

    /// Build the public URL for a storage key
    ///
    /// Pure string construction; no check that the file exists.
    pub fn public_url(&self, relative_path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        format!("{}/{}/{}", base, UPLOAD_MOUNT, relative_path)
    }

    /// Read a stored payload back by its key
    pub async fn fetch(&self, relative_path: &str) -> Result<Vec<u8>> {
        self.store.read(relative_path).await
    }

    /// Delete a stored payload; missing keys are a no-op
    pub async fn remove(&self, relative_path: &str) -> Result<()> {
        self.store.delete(relative_path).await
    }

    /// List the keys of every stored file
    pub async fn list(&self) -> Result<Vec<String>> {
        self.store.list_all().await
    }
}

/// Hex SHA-256 of a payload
fn checksum_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    format!("{:x}", hasher.finalize())
}
