//! Media adapter over the object store.
//!
//! Upload flow:
//!
//! 1. [`MediaService::generate_upload_grant`] validates the declared content
//!    type and returns a presigned `PUT` URL plus a fresh key under the
//!    caller's `users/{id}/` prefix.
//! 2. The client uploads the bytes directly to the bucket.
//! 3. [`MediaService::register_asset`] re-validates the key, checks that its
//!    embedded owner is the caller, checks note ownership, signs the read URL,
//!    and only then inserts the `media_assets` row.

use std::collections::HashMap;
use std::sync::Arc;

use backlog_core::error::CoreError;
use backlog_core::media_key::{generate_object_key, parse_object_key};
use backlog_core::types::DbId;
use backlog_db::models::media_asset::{CreateMediaAsset, MediaAsset};
use backlog_db::BacklogStore;
use backlog_storage::ObjectStore;
use serde::Serialize;

use crate::access::ensure_owner;
use crate::error::EngineResult;
use crate::views::AssetView;

/// Presigned upload target returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct UploadGrant {
    pub upload_url: String,
    pub object_key: String,
}

pub struct MediaService {
    store: Arc<dyn BacklogStore>,
    objects: Arc<dyn ObjectStore>,
}

impl MediaService {
    pub fn new(store: Arc<dyn BacklogStore>, objects: Arc<dyn ObjectStore>) -> Self {
        Self { store, objects }
    }

    /// Issue a presigned upload URL for a whitelisted image content type.
    pub async fn generate_upload_grant(
        &self,
        owner_id: DbId,
        content_type: &str,
    ) -> EngineResult<UploadGrant> {
        let object_key = generate_object_key(owner_id, content_type)?;
        let upload_url = self
            .objects
            .presign_upload(&object_key, &content_type.to_ascii_lowercase())
            .await?;
        tracing::info!(owner_id, object_key = %object_key, "Issued upload grant");
        Ok(UploadGrant {
            upload_url,
            object_key,
        })
    }

    /// Record an uploaded object against a progress note.
    ///
    /// Key format and the embedded owner id are checked before the note is
    /// even looked up, so a guessed or foreign key is rejected without
    /// touching the database.
    pub async fn register_asset(
        &self,
        caller_id: DbId,
        object_key: &str,
        note_id: DbId,
    ) -> EngineResult<AssetView> {
        let parsed = parse_object_key(object_key).inspect_err(|_| {
            tracing::warn!(object_key, caller_id, "Rejected malformed object key");
        })?;
        if parsed.owner_id != caller_id {
            tracing::warn!(
                object_key,
                key_owner_id = parsed.owner_id,
                caller_id,
                "Object key owner mismatch"
            );
            return Err(CoreError::AccessDenied(format!(
                "object key is not owned by user {caller_id}"
            ))
            .into());
        }

        let note = self
            .store
            .find_note(note_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "ProgressNote",
                id: note_id,
            })?;
        ensure_owner("ProgressNote", note.id, note.author_id, caller_id)?;

        // Nothing may fail after the insert.
        let url = self.read_url(object_key, false).await?;
        let asset = self
            .store
            .insert_media_asset(&CreateMediaAsset {
                note_id,
                object_key: object_key.to_string(),
                filename: parsed.filename,
                content_type: parsed.content_type.to_string(),
            })
            .await?;
        tracing::info!(asset_id = asset.id, note_id, "Registered media asset");
        Ok(AssetView::new(asset, url))
    }

    /// URL for reading `object_key`.
    ///
    /// Private context gets a short-lived presigned URL. Public context gets
    /// the permanent public URL, falling back to a presigned one when no
    /// public base is configured.
    pub async fn read_url(&self, object_key: &str, public_context: bool) -> EngineResult<String> {
        if public_context {
            if let Some(url) = self.objects.public_url(object_key) {
                return Ok(url);
            }
        }
        Ok(self.objects.presign_read(object_key).await?)
    }

    /// Delete one object, logging and swallowing any failure.
    ///
    /// Returns whether the delete succeeded. A failure leaves an orphaned
    /// object in the bucket; the database is never touched here.
    pub async fn delete_object(&self, object_key: &str) -> bool {
        match self.objects.delete_object(object_key).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(
                    object_key,
                    error = %e,
                    "Failed to delete object, leaving orphaned object"
                );
                false
            }
        }
    }

    /// Assets of `note_ids` grouped by note, each with a context-appropriate URL.
    pub(crate) async fn assets_by_note(
        &self,
        note_ids: &[DbId],
        public_context: bool,
    ) -> EngineResult<HashMap<DbId, Vec<AssetView>>> {
        let assets: Vec<MediaAsset> = self.store.list_assets_for_notes(note_ids).await?;
        let mut grouped: HashMap<DbId, Vec<AssetView>> = HashMap::new();
        for asset in assets {
            let url = self.read_url(&asset.object_key, public_context).await?;
            grouped
                .entry(asset.note_id)
                .or_default()
                .push(AssetView::new(asset, url));
        }
        Ok(grouped)
    }

    /// Latest image URL per project.
    pub(crate) async fn thumbnails(
        &self,
        project_ids: &[DbId],
        public_context: bool,
    ) -> EngineResult<HashMap<DbId, String>> {
        let rows = self
            .store
            .latest_assets_for_projects(project_ids, public_context)
            .await?;
        let mut urls = HashMap::with_capacity(rows.len());
        for row in rows {
            let url = self.read_url(&row.object_key, public_context).await?;
            urls.insert(row.project_id, url);
        }
        Ok(urls)
    }
}
