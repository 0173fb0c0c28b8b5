//! Object storage for uploaded images.
//!
//! The [`ObjectStore`] trait covers exactly what the backlog needs from an
//! S3-compatible bucket: presigned upload and read URLs, an optional
//! permanent public URL, and single-object delete. [`S3ObjectStore`] targets
//! AWS S3, Cloudflare R2, or MinIO through `aws-sdk-s3`.

pub mod config;
pub mod error;
pub mod s3;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod memory;

pub use config::StorageConfig;
pub use error::{StorageError, StorageResult};
pub use s3::S3ObjectStore;
pub use traits::ObjectStore;
