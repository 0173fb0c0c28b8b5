//! Repository for the `media_assets` table.

use backlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::media_asset::{CreateMediaAsset, MediaAsset, ProjectThumbnail};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, note_id, object_key, filename, content_type, created_at";

/// Provides insert and lookup operations for media assets. Deletion only
/// happens through [`ProjectRepo::delete_cascade`](super::ProjectRepo::delete_cascade).
pub struct MediaAssetRepo;

impl MediaAssetRepo {
    pub async fn create(pool: &PgPool, input: &CreateMediaAsset) -> Result<MediaAsset, sqlx::Error> {
        let query = format!(
            "INSERT INTO media_assets (note_id, object_key, filename, content_type)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(input.note_id)
            .bind(&input.object_key)
            .bind(&input.filename)
            .bind(&input.content_type)
            .fetch_one(pool)
            .await
    }

    /// Assets attached to any of `note_ids`, oldest first.
    pub async fn list_by_notes(
        pool: &PgPool,
        note_ids: &[DbId],
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM media_assets WHERE note_id = ANY($1)
             ORDER BY created_at, id"
        );
        sqlx::query_as::<_, MediaAsset>(&query)
            .bind(note_ids)
            .fetch_all(pool)
            .await
    }

    /// Latest asset per project. With `public_only`, only assets on public
    /// notes are considered.
    pub async fn latest_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
        public_only: bool,
    ) -> Result<Vec<ProjectThumbnail>, sqlx::Error> {
        sqlx::query_as::<_, ProjectThumbnail>(
            "SELECT DISTINCT ON (n.project_id) n.project_id, a.object_key
             FROM media_assets a
             JOIN progress_notes n ON n.id = a.note_id
             WHERE n.project_id = ANY($1) AND (n.is_public OR NOT $2)
             ORDER BY n.project_id, a.created_at DESC, a.id DESC",
        )
        .bind(project_ids)
        .bind(public_only)
        .fetch_all(pool)
        .await
    }
}
