//! Error types for the filedrop upload store
//!
//! All errors use thiserror for structured error handling.
//! I/O failures propagate unchanged; the caller decides how to present them.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid collection name: {0}")]
    InvalidCollection(String),

    #[error("Invalid relative path: {0}")]
    InvalidPath(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
