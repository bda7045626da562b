//! Upload store configuration
//!
//! Central location for configuration constants, naming limits, and the
//! explicit configuration struct passed into the service at construction.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ===== Defaults =====

/// Public URL prefix used when `API_BASE_URL` is not set
pub const DEFAULT_BASE_URL: &str = "http://localhost:3001";

/// Root storage directory used when `UPLOAD_DIR` is not set,
/// resolved relative to the process working directory
pub const DEFAULT_UPLOAD_ROOT: &str = "uploads";

/// Fixed mount segment between the base URL and the relative path
pub const UPLOAD_MOUNT: &str = "uploads";

// ===== Name Generation Limits =====

/// Length of the random base36 token in generated filenames
pub const TOKEN_LEN: usize = 6;

/// Maximum length of a preserved file extension (without the dot).
/// Anything longer is almost certainly not a real extension.
pub const MAX_EXTENSION_LEN: usize = 16;

/// Maximum length for a sanitized collection name
pub const MAX_COLLECTION_LEN: usize = 255;

/// Configuration for the upload store and public URL construction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Root directory all uploads are stored under
    pub root: PathBuf,
    /// Public base URL prefixed to derived URLs
    pub base_url: String,
}

impl UploadConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset or blank
    pub fn from_env() -> Self {
        let base_url = std::env::var("API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let root = std::env::var("UPLOAD_DIR")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOAD_ROOT));

        Self { root, base_url }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_UPLOAD_ROOT),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
