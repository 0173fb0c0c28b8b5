//! Storage trait definitions.

use async_trait::async_trait;

use crate::error::StorageResult;

/// Minimal object-store surface used by the media service.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Presigned `PUT` URL for uploading `key` with the given content type.
    async fn presign_upload(&self, key: &str, content_type: &str) -> StorageResult<String>;

    /// Short-lived presigned `GET` URL for `key`.
    async fn presign_read(&self, key: &str) -> StorageResult<String>;

    /// Permanent URL for `key`, or `None` when no public base is configured.
    fn public_url(&self, key: &str) -> Option<String>;

    /// Delete a single object. One attempt, no retry.
    async fn delete_object(&self, key: &str) -> StorageResult<()>;
}
