//! Media asset entity model and DTOs.

use backlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `media_assets` table: metadata for one uploaded image.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct MediaAsset {
    pub id: DbId,
    pub note_id: DbId,
    pub object_key: String,
    pub filename: String,
    pub content_type: String,
    pub created_at: Timestamp,
}

/// Insert DTO. Built server-side from a validated object key, never
/// deserialized from a request.
#[derive(Debug, Clone)]
pub struct CreateMediaAsset {
    pub note_id: DbId,
    pub object_key: String,
    pub filename: String,
    pub content_type: String,
}

/// Most recent asset key for a project, used as its thumbnail.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectThumbnail {
    pub project_id: DbId,
    pub object_key: String,
}
