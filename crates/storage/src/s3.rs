//! S3-compatible object store using AWS SDK.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::Client;
use tracing::instrument;

use crate::config::StorageConfig;
use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;

fn s3_error<E>(err: E) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::S3(Box::new(err))
}

/// Object store backed by an S3-compatible bucket (AWS S3, R2, MinIO).
pub struct S3ObjectStore {
    client: Client,
    bucket: String,
    presign_expiry: Duration,
    public_url_base: Option<String>,
}

impl std::fmt::Debug for S3ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3ObjectStore")
            .field("bucket", &self.bucket)
            .field("presign_expiry", &self.presign_expiry)
            .field("public_url_base", &self.public_url_base)
            .finish_non_exhaustive()
    }
}

impl S3ObjectStore {
    /// Build a client from `config`.
    ///
    /// Static credentials are used when both halves are configured; otherwise
    /// the ambient AWS credential chain is loaded. A custom endpoint implies
    /// path-style addressing, which R2 and MinIO expect.
    pub async fn new(config: &StorageConfig) -> StorageResult<Self> {
        config.validate()?;

        let region = aws_config::Region::new(config.region.clone());
        let mut builder = match (&config.access_key_id, &config.secret_access_key) {
            (Some(key_id), Some(secret)) => {
                let credentials =
                    Credentials::new(key_id.clone(), secret.clone(), None, None, "backlog-config");
                aws_sdk_s3::config::Builder::new()
                    .behavior_version(BehaviorVersion::latest())
                    .region(region)
                    .credentials_provider(credentials)
            }
            _ => {
                let shared = aws_config::defaults(BehaviorVersion::latest())
                    .region(region)
                    .load()
                    .await;
                aws_sdk_s3::config::Builder::from(&shared)
            }
        };

        if let Some(endpoint) = &config.endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
            bucket: config.bucket.clone(),
            presign_expiry: config.presign_expiry,
            public_url_base: config.public_url_base.clone(),
        })
    }

    fn presigning_config(&self) -> StorageResult<PresigningConfig> {
        PresigningConfig::expires_in(self.presign_expiry)
            .map_err(|e| StorageError::Presign(e.to_string()))
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    #[instrument(skip(self), fields(backend = "s3"))]
    async fn presign_upload(&self, key: &str, content_type: &str) -> StorageResult<String> {
        let request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(self.presigning_config()?)
            .await
            .map_err(s3_error)?;
        Ok(request.uri().to_string())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn presign_read(&self, key: &str) -> StorageResult<String> {
        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(self.presigning_config()?)
            .await
            .map_err(s3_error)?;
        Ok(request.uri().to_string())
    }

    fn public_url(&self, key: &str) -> Option<String> {
        self.public_url_base
            .as_ref()
            .map(|base| format!("{base}/{key}"))
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(s3_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(public_url_base: Option<&str>) -> StorageConfig {
        StorageConfig {
            bucket: "media".to_string(),
            endpoint: Some("http://127.0.0.1:9000".to_string()),
            region: "auto".to_string(),
            access_key_id: Some("test-key".to_string()),
            secret_access_key: Some("test-secret".to_string()),
            presign_expiry: Duration::from_secs(900),
            public_url_base: public_url_base.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn presigned_upload_url_targets_bucket_and_key() {
        let store = S3ObjectStore::new(&config(None)).await.unwrap();
        let url = store
            .presign_upload("users/1/a.png", "image/png")
            .await
            .unwrap();
        assert!(url.starts_with("http://127.0.0.1:9000/media/users/1/a.png?"));
        assert!(url.contains("X-Amz-Expires=900"));
    }

    #[tokio::test]
    async fn presigned_read_url_is_signed() {
        let store = S3ObjectStore::new(&config(None)).await.unwrap();
        let url = store.presign_read("users/1/a.png").await.unwrap();
        assert!(url.contains("X-Amz-Signature="));
    }

    #[tokio::test]
    async fn public_url_requires_base() {
        let without = S3ObjectStore::new(&config(None)).await.unwrap();
        assert_eq!(without.public_url("users/1/a.png"), None);

        let with = S3ObjectStore::new(&config(Some("https://cdn.example.com")))
            .await
            .unwrap();
        assert_eq!(
            with.public_url("users/1/a.png").as_deref(),
            Some("https://cdn.example.com/users/1/a.png")
        );
    }
}
