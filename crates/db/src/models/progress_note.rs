//! Progress note entity model and DTOs.

use backlog_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `progress_notes` table.
///
/// Visibility is independent of the parent project: a public project may
/// hold private notes.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressNote {
    pub id: DbId,
    pub project_id: DbId,
    pub author_id: DbId,
    pub content: String,
    pub is_public: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a note.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProgressNote {
    pub project_id: DbId,
    pub content: String,
    /// Defaults to private if omitted.
    pub is_public: Option<bool>,
}

/// DTO for updating a note. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProgressNote {
    pub content: Option<String>,
    pub is_public: Option<bool>,
}
