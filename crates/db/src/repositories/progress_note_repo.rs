//! Repository for the `progress_notes` table.

use backlog_core::types::DbId;
use sqlx::PgPool;

use crate::models::progress_note::{CreateProgressNote, ProgressNote, UpdateProgressNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, author_id, content, is_public, created_at, updated_at";

/// Provides CRUD and feed queries for progress notes.
pub struct ProgressNoteRepo;

impl ProgressNoteRepo {
    /// Insert a new note, returning the created row.
    ///
    /// If `is_public` is `None` in the input, the note is private.
    pub async fn create(
        pool: &PgPool,
        author_id: DbId,
        input: &CreateProgressNote,
    ) -> Result<ProgressNote, sqlx::Error> {
        let query = format!(
            "INSERT INTO progress_notes (project_id, author_id, content, is_public)
             VALUES ($1, $2, $3, COALESCE($4, false))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(input.project_id)
            .bind(author_id)
            .bind(&input.content)
            .bind(input.is_public)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ProgressNote>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM progress_notes WHERE id = $1");
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Every note of a project regardless of visibility. Used by the cascade.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProgressNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_notes WHERE project_id = $1 ORDER BY id"
        );
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// One page of a project's notes, newest first. With `public_only` set,
    /// private notes are excluded.
    pub async fn list_page_by_project(
        pool: &PgPool,
        project_id: DbId,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProgressNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_notes
             WHERE project_id = $1 AND (is_public OR NOT $2)
             ORDER BY created_at DESC, id DESC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(project_id)
            .bind(public_only)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_by_project(
        pool: &PgPool,
        project_id: DbId,
        public_only: bool,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM progress_notes
             WHERE project_id = $1 AND (is_public OR NOT $2)",
        )
        .bind(project_id)
        .bind(public_only)
        .fetch_one(pool)
        .await
    }

    /// Global feed of public notes, newest first.
    pub async fn list_public(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProgressNote>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progress_notes WHERE is_public
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count_public(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM progress_notes WHERE is_public")
            .fetch_one(pool)
            .await
    }

    /// Update a note. Only non-`None` fields in `input` are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProgressNote,
    ) -> Result<Option<ProgressNote>, sqlx::Error> {
        let query = format!(
            "UPDATE progress_notes SET
                content = COALESCE($2, content),
                is_public = COALESCE($3, is_public)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressNote>(&query)
            .bind(id)
            .bind(&input.content)
            .bind(input.is_public)
            .fetch_optional(pool)
            .await
    }
}
