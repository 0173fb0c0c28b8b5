//! Project like entity model.

use backlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `project_likes` table. Unique per `(user_id, project_id)`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectLike {
    pub id: DbId,
    pub user_id: DbId,
    pub project_id: DbId,
    pub created_at: Timestamp,
}

/// Aggregated like count for one project.
#[derive(Debug, Clone, FromRow)]
pub struct LikeCount {
    pub project_id: DbId,
    pub like_count: i64,
}
