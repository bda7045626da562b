//! Filesystem upload store
//!
//! Persists uploaded payloads under a managed root directory, optionally
//! inside a one-level collection subdirectory. Names are generated, never
//! caller-supplied: an epoch-millis timestamp plus a short random base36
//! token, preserving the original file extension.
//!
//! Example: payload named "photo.PNG" in collection "avatars" is stored at
//! "avatars/1712345678901-k3f9qa.PNG"

use crate::config::{MAX_COLLECTION_LEN, MAX_EXTENSION_LEN, TOKEN_LEN};
use crate::error::{AppError, Result};
use rand::Rng;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Suffix for in-flight temp files, renamed away on completion
const PART_SUFFIX: &str = ".part";

/// A stored upload, described by its generated key
#[derive(Debug, Clone, Serialize)]
pub struct StoredFile {
    /// Path relative to the store root; the portable storage key
    pub relative_path: String,
    /// Absolute location on disk (deployment-specific, never handed to clients)
    pub absolute_path: PathBuf,
    /// Preserved extension without the leading dot (may be empty)
    pub extension: String,
    /// Payload size in bytes
    pub size: u64,
}

/// Filesystem-backed upload store
#[derive(Clone)]
pub struct UploadStore {
    root: PathBuf,
}

impl UploadStore {
    /// Create a new store rooted at the given directory
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Create the root directory if needed (idempotent)
    pub async fn ensure_root(&self) -> Result<()> {
        fs::create_dir_all(&self.root).await?;
        tracing::info!("Upload store initialized at: {:?}", self.root);
        Ok(())
    }

    /// Store a payload under a freshly generated name, returning its key
    ///
    /// `original_name` is used only to extract a file extension. A `Some`
    /// collection places the file one directory level down and prefixes the
    /// returned key; blank collections are treated as absent. Names are
    /// always freshly generated, so an existing file is never overwritten.
    pub async fn store(
        &self,
        payload: &[u8],
        original_name: &str,
        collection: Option<&str>,
    ) -> Result<StoredFile> {
        let collection = match collection.filter(|c| !c.trim().is_empty()) {
            Some(c) => Some(sanitize_collection(c)?),
            None => None,
        };

        let extension = extract_extension(original_name);
        let filename = generate_name(&extension);

        let (dir, relative_path) = match &collection {
            Some(c) => (self.root.join(c), format!("{}/{}", c, filename)),
            None => (self.root.clone(), filename.clone()),
        };

        // Safe to repeat; the directory may pre-exist
        fs::create_dir_all(&dir).await?;

        let path = dir.join(&filename);

        // Write to temp file first, then rename into place
        let temp_path = dir.join(format!("{}{}", filename, PART_SUFFIX));
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(payload).await?;
        file.sync_all().await?;
        fs::rename(&temp_path, &path).await?;

        tracing::info!("Stored upload: {} ({} bytes)", relative_path, payload.len());

        Ok(StoredFile {
            relative_path,
            absolute_path: path,
            extension,
            size: payload.len() as u64,
        })
    }

    /// Read a stored payload back by its key
    pub async fn read(&self, relative_path: &str) -> Result<Vec<u8>> {
        let path = self.resolve(relative_path)?;

        if !path.exists() {
            return Err(AppError::NotFound(relative_path.to_string()));
        }

        let data = fs::read(&path).await?;

        tracing::debug!("Read upload: {} ({} bytes)", relative_path, data.len());

        Ok(data)
    }

    /// Check whether a key refers to a stored file
    pub async fn exists(&self, relative_path: &str) -> Result<bool> {
        let path = self.resolve(relative_path)?;
        Ok(path.exists())
    }

    /// Delete a stored file; deleting a missing key is not an error
    pub async fn delete(&self, relative_path: &str) -> Result<()> {
        let path = self.resolve(relative_path)?;

        if !path.exists() {
            return Ok(()); // Already deleted
        }

        fs::remove_file(&path).await?;

        tracing::info!("Deleted upload: {}", relative_path);

        Ok(())
    }

    /// List the keys of every stored file (root plus one collection level)
    pub async fn list_all(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        if !self.root.exists() {
            return Ok(keys);
        }

        let mut entries = fs::read_dir(&self.root).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            if path.is_file() {
                if let Some(name) = file_key(&path) {
                    keys.push(name);
                }
            } else if path.is_dir() {
                let collection = match path.file_name().and_then(|n| n.to_str()) {
                    Some(n) => n.to_string(),
                    None => continue,
                };

                let mut sub_entries = fs::read_dir(&path).await?;
                while let Some(sub_entry) = sub_entries.next_entry().await? {
                    let sub_path = sub_entry.path();
                    if sub_path.is_file() {
                        if let Some(name) = file_key(&sub_path) {
                            keys.push(format!("{}/{}", collection, name));
                        }
                    }
                }
            }
        }

        Ok(keys)
    }

    /// Get the store root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a relative key onto the root, rejecting traversal
    fn resolve(&self, relative_path: &str) -> Result<PathBuf> {
        let valid = !relative_path.is_empty()
            && !relative_path.contains('\0')
            && !relative_path.contains('\\')
            && relative_path
                .split('/')
                .all(|seg| !seg.is_empty() && seg != "." && seg != "..");

        if !valid {
            return Err(AppError::InvalidPath(relative_path.to_string()));
        }

        Ok(self.root.join(relative_path))
    }
}

/// Extract the key for a stored file, skipping in-flight temp files
fn file_key(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(PART_SUFFIX) {
        return None;
    }
    Some(name.to_string())
}

/// Generate a collision-resistant filename: epoch millis plus a random
/// base36 token. Best-effort uniqueness, not a cryptographic guarantee.
fn generate_name(extension: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();

    let mut rng = rand::thread_rng();
    let token: String = (0..TOKEN_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();

    if extension.is_empty() {
        format!("{}-{}", millis, token)
    } else {
        format!("{}-{}.{}", millis, token, extension)
    }
}

/// Extract a safe extension from a suggested filename, case preserved.
/// Returns an empty string when the name has no usable extension.
fn extract_extension(original_name: &str) -> String {
    Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.chars()
                .filter(|c| c.is_ascii_alphanumeric())
                .take(MAX_EXTENSION_LEN)
                .collect::<String>()
        })
        .filter(|e| !e.is_empty())
        .unwrap_or_default()
}

/// Sanitize a collection name into a single safe path segment
fn sanitize_collection(name: &str) -> Result<String> {
    let cleaned: String = name
        .chars()
        .filter(|c| *c != '/' && *c != '\\' && *c != '\0')
        .collect::<String>()
        .chars()
        .take(MAX_COLLECTION_LEN)
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return Err(AppError::InvalidCollection(name.to_string()));
    }

    Ok(cleaned)
}
