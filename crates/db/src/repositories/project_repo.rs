//! Repository for the `projects` table, including the cascading delete.

use backlog_core::status::StepStatus;
use backlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::step::Step;
use crate::repositories::step_repo::COLUMNS as STEP_COLUMNS;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, title, description, is_public, created_at, updated_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a project and one `Todo` step per template name in a single
    /// transaction. Step `order_index` is the name's position.
    pub async fn create_with_steps(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateProject,
        step_names: &[&str],
    ) -> Result<(Project, Vec<Step>), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (owner_id, title, description)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        let names: Vec<String> = step_names.iter().map(|n| n.to_string()).collect();
        let query = format!(
            "INSERT INTO steps (project_id, name, status_id, order_index)
             SELECT $1, t.name, $2, (t.ord - 1)::int
             FROM UNNEST($3::text[]) WITH ORDINALITY AS t(name, ord)
             RETURNING {STEP_COLUMNS}"
        );
        let mut steps = sqlx::query_as::<_, Step>(&query)
            .bind(project.id)
            .bind(StepStatus::Todo.id())
            .bind(&names)
            .fetch_all(&mut *tx)
            .await?;
        steps.sort_by_key(|s| s.order_index);

        tx.commit().await?;
        Ok((project, steps))
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project by ID only if it is public.
    pub async fn find_public_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND is_public");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several projects at once. Order is unspecified.
    pub async fn list_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = ANY($1)");
        sqlx::query_as::<_, Project>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List an owner's projects, newest first.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_ids_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE owner_id = $1 ORDER BY id")
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// List public projects, most recently updated first.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE is_public
             ORDER BY updated_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM projects WHERE is_public")
            .fetch_one(pool)
            .await
    }

    /// List every project for the admin view, optionally filtered by a
    /// case-insensitive title substring. Newest first.
    pub async fn list_all(
        pool: &PgPool,
        title: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(title)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_all(pool: &PgPool, title: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM projects
             WHERE ($1::text IS NULL OR title ILIKE '%' || $1 || '%')",
        )
        .bind(title)
        .fetch_one(pool)
        .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                is_public = COALESCE($4, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project and every dependent row in one transaction.
    ///
    /// Order: media assets of `note_ids`, progress notes, steps, likes, and
    /// the project row last. Returns `false` (after rolling back) when the
    /// project row was already gone, which is how a losing concurrent delete
    /// observes the race.
    pub async fn delete_cascade(
        pool: &PgPool,
        id: DbId,
        note_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if !note_ids.is_empty() {
            sqlx::query("DELETE FROM media_assets WHERE note_id = ANY($1)")
                .bind(note_ids)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM progress_notes WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM steps WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM project_likes WHERE project_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
