//! Repository for the `project_likes` table.

use backlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::like::LikeCount;

/// Provides toggle and aggregate queries for likes.
pub struct LikeRepo;

impl LikeRepo {
    /// Remove the like if present, otherwise add it. Returns whether the
    /// project is liked afterwards.
    pub async fn toggle(pool: &PgPool, user_id: DbId, project_id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let removed = sqlx::query("DELETE FROM project_likes WHERE user_id = $1 AND project_id = $2")
            .bind(user_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        let liked = if removed.rows_affected() > 0 {
            false
        } else {
            sqlx::query(
                "INSERT INTO project_likes (user_id, project_id) VALUES ($1, $2)
                 ON CONFLICT ON CONSTRAINT uq_project_likes_user_project DO NOTHING",
            )
            .bind(user_id)
            .bind(project_id)
            .execute(&mut *tx)
            .await?;
            true
        };

        tx.commit().await?;
        Ok(liked)
    }

    pub async fn count_by_project(pool: &PgPool, project_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM project_likes WHERE project_id = $1")
            .bind(project_id)
            .fetch_one(pool)
            .await
    }

    /// Like counts for several projects. Projects without likes are absent.
    pub async fn counts_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<LikeCount>, sqlx::Error> {
        sqlx::query_as::<_, LikeCount>(
            "SELECT project_id, COUNT(*) AS like_count FROM project_likes
             WHERE project_id = ANY($1)
             GROUP BY project_id",
        )
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }

    /// Subset of `project_ids` the user has liked.
    pub async fn liked_project_ids(
        pool: &PgPool,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT project_id FROM project_likes WHERE user_id = $1 AND project_id = ANY($2)",
        )
        .bind(user_id)
        .bind(project_ids)
        .fetch_all(pool)
        .await
    }
}
