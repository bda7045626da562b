//! Storage module
//!
//! Filesystem persistence for uploaded payloads.

pub mod upload_store;

pub use upload_store::{StoredFile, UploadStore};
