//! Repository for the `steps` table.

use backlog_core::status::StatusId;
use backlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::step::Step;

/// Column list shared across queries to avoid repetition.
pub(crate) const COLUMNS: &str =
    "id, project_id, name, status_id, order_index, created_at, updated_at";

/// Provides read and status-update operations for steps.
pub struct StepRepo;

impl StepRepo {
    /// List a project's steps ordered by `order_index`.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Step>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM steps WHERE project_id = $1 ORDER BY order_index"
        );
        sqlx::query_as::<_, Step>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Steps of several projects, grouped by project then ordered by `order_index`.
    pub async fn list_by_projects(
        pool: &PgPool,
        project_ids: &[DbId],
    ) -> Result<Vec<Step>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM steps WHERE project_id = ANY($1)
             ORDER BY project_id, order_index"
        );
        sqlx::query_as::<_, Step>(&query)
            .bind(project_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Step>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM steps WHERE id = $1");
        sqlx::query_as::<_, Step>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Set one step's status. Returns `None` if the step does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Step>, sqlx::Error> {
        let query = format!(
            "UPDATE steps SET status_id = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Step>(&query)
            .bind(id)
            .bind(status_id)
            .fetch_optional(pool)
            .await
    }

    /// Write a full set of step statuses for one project atomically.
    ///
    /// The project row is locked `FOR UPDATE` first, so concurrent bulk
    /// transitions on the same project serialize and the last committer wins.
    /// Returns `None` (after rolling back) if the project no longer exists;
    /// otherwise the updated steps ordered by `order_index`.
    pub async fn apply_statuses(
        pool: &PgPool,
        project_id: DbId,
        step_ids: &[DbId],
        status_ids: &[StatusId],
    ) -> Result<Option<Vec<Step>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query(
            "UPDATE steps SET status_id = u.status_id
             FROM UNNEST($2::bigint[], $3::smallint[]) AS u(id, status_id)
             WHERE steps.id = u.id AND steps.project_id = $1
               AND steps.status_id <> u.status_id",
        )
        .bind(project_id)
        .bind(step_ids)
        .bind(status_ids)
        .execute(&mut *tx)
        .await?;

        let query = format!(
            "SELECT {COLUMNS} FROM steps WHERE project_id = $1 ORDER BY order_index"
        );
        let steps = sqlx::query_as::<_, Step>(&query)
            .bind(project_id)
            .fetch_all(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(steps))
    }
}
