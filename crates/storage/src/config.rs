//! Object storage configuration loaded from environment variables.

use std::time::Duration;

use crate::error::{StorageError, StorageResult};

/// Default presigned URL lifetime in minutes.
pub const DEFAULT_PRESIGN_EXPIRY_MINS: u64 = 15;

/// Settings for an S3-compatible bucket.
///
/// | Env var                       | Default |
/// |-------------------------------|---------|
/// | `STORAGE_BUCKET`              | required |
/// | `STORAGE_ENDPOINT`            | none (AWS) |
/// | `STORAGE_REGION`              | `auto` |
/// | `STORAGE_ACCESS_KEY_ID`       | none |
/// | `STORAGE_SECRET_ACCESS_KEY`   | none |
/// | `STORAGE_PRESIGN_EXPIRY_MINS` | `15` |
/// | `STORAGE_PUBLIC_URL_BASE`     | none |
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub endpoint: Option<String>,
    pub region: String,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub presign_expiry: Duration,
    /// Base for permanent public URLs, without a trailing slash.
    pub public_url_base: Option<String>,
}

impl StorageConfig {
    /// Read settings from the environment.
    pub fn from_env() -> StorageResult<Self> {
        let bucket = non_empty_var("STORAGE_BUCKET")
            .ok_or_else(|| StorageError::Config("STORAGE_BUCKET must be set".to_string()))?;

        let presign_expiry_mins: u64 = match non_empty_var("STORAGE_PRESIGN_EXPIRY_MINS") {
            Some(raw) => raw.parse().map_err(|_| {
                StorageError::Config(format!(
                    "STORAGE_PRESIGN_EXPIRY_MINS must be a valid u64, got '{raw}'"
                ))
            })?,
            None => DEFAULT_PRESIGN_EXPIRY_MINS,
        };

        let config = Self {
            bucket,
            endpoint: non_empty_var("STORAGE_ENDPOINT"),
            region: non_empty_var("STORAGE_REGION").unwrap_or_else(|| "auto".to_string()),
            access_key_id: non_empty_var("STORAGE_ACCESS_KEY_ID"),
            secret_access_key: non_empty_var("STORAGE_SECRET_ACCESS_KEY"),
            presign_expiry: Duration::from_secs(presign_expiry_mins * 60),
            public_url_base: non_empty_var("STORAGE_PUBLIC_URL_BASE")
                .map(|base| base.trim_end_matches('/').to_string()),
        };
        config.validate()?;
        Ok(config)
    }

    /// Static credentials must be given as a pair or not at all.
    pub fn validate(&self) -> StorageResult<()> {
        if self.access_key_id.is_some() != self.secret_access_key.is_some() {
            return Err(StorageError::Config(
                "STORAGE_ACCESS_KEY_ID and STORAGE_SECRET_ACCESS_KEY must be set together"
                    .to_string(),
            ));
        }
        if self.presign_expiry.is_zero() {
            return Err(StorageError::Config(
                "STORAGE_PRESIGN_EXPIRY_MINS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
