//! Services module
//!
//! Business logic coordinating the upload store with configuration.

pub mod uploads;

pub use uploads::{UploadReceipt, UploadService};
