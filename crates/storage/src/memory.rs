//! In-memory [`ObjectStore`] for tests.
//!
//! Presigned URLs are deterministic strings. Every delete attempt is
//! recorded, including ones made to fail with [`MemoryObjectStore::fail_deletes_for`].

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;

#[derive(Default)]
struct State {
    delete_attempts: Vec<String>,
    failing_keys: HashSet<String>,
    fail_presign: bool,
}

#[derive(Default)]
pub struct MemoryObjectStore {
    public_url_base: Option<String>,
    state: Mutex<State>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_public_url_base(base: &str) -> Self {
        Self {
            public_url_base: Some(base.trim_end_matches('/').to_string()),
            state: Mutex::default(),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every delete of `key` fail.
    pub fn fail_deletes_for(&self, key: &str) {
        self.state().failing_keys.insert(key.to_string());
    }

    /// Make presigning fail until cleared.
    pub fn set_fail_presign(&self, fail: bool) {
        self.state().fail_presign = fail;
    }

    /// Keys passed to `delete_object`, in call order.
    pub fn delete_attempts(&self) -> Vec<String> {
        self.state().delete_attempts.clone()
    }
}

#[async_trait]
impl ObjectStore for MemoryObjectStore {
    async fn presign_upload(&self, key: &str, content_type: &str) -> StorageResult<String> {
        if self.state().fail_presign {
            return Err(StorageError::Presign("injected failure".to_string()));
        }
        Ok(format!("memory://upload/{key}?content-type={content_type}"))
    }

    async fn presign_read(&self, key: &str) -> StorageResult<String> {
        if self.state().fail_presign {
            return Err(StorageError::Presign("injected failure".to_string()));
        }
        Ok(format!("memory://read/{key}?signed=1"))
    }

    fn public_url(&self, key: &str) -> Option<String> {
        self.public_url_base
            .as_ref()
            .map(|base| format!("{base}/{key}"))
    }

    async fn delete_object(&self, key: &str) -> StorageResult<()> {
        let mut state = self.state();
        state.delete_attempts.push(key.to_string());
        if state.failing_keys.contains(key) {
            return Err(StorageError::S3(format!("injected failure deleting {key}").into()));
        }
        Ok(())
    }
}
