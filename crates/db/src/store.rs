//! The persistence seam consumed by `backlog_engine`.
//!
//! [`BacklogStore`] groups every query the services need behind one
//! object-safe trait so the engine can be exercised against the in-memory
//! store in `crate::memory`. [`PgBacklogStore`] delegates to the repositories.

use async_trait::async_trait;
use backlog_core::status::StatusId;
use backlog_core::types::DbId;

use crate::models::like::LikeCount;
use crate::models::media_asset::{CreateMediaAsset, MediaAsset, ProjectThumbnail};
use crate::models::progress_note::{CreateProgressNote, ProgressNote, UpdateProgressNote};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::step::Step;
use crate::repositories::{LikeRepo, MediaAssetRepo, ProgressNoteRepo, ProjectRepo, StepRepo};
use crate::DbPool;

#[async_trait]
pub trait BacklogStore: Send + Sync {
    /// Cheap reachability probe for the health endpoint.
    async fn ping(&self) -> Result<(), sqlx::Error>;

    // -- projects ---------------------------------------------------------

    /// Atomically insert a project and its template steps (all `Todo`).
    async fn create_project_with_steps(
        &self,
        owner_id: DbId,
        input: &CreateProject,
        step_names: &[&str],
    ) -> Result<(Project, Vec<Step>), sqlx::Error>;

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error>;

    async fn find_public_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error>;

    async fn list_projects_by_ids(&self, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error>;

    /// Newest first.
    async fn list_projects_by_owner(&self, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error>;

    async fn list_project_ids_by_owner(&self, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error>;

    /// Most recently updated first.
    async fn list_public_projects(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error>;

    /// Admin listing with an optional case-insensitive title filter.
    async fn list_all_projects(
        &self,
        title: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error>;

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error>;

    /// Delete the project and every dependent row in one transaction.
    /// Returns `false` if the project row was already gone.
    async fn delete_project_cascade(
        &self,
        project_id: DbId,
        note_ids: &[DbId],
    ) -> Result<bool, sqlx::Error>;

    // -- steps ------------------------------------------------------------

    /// Ordered by `order_index`.
    async fn list_steps(&self, project_id: DbId) -> Result<Vec<Step>, sqlx::Error>;

    async fn list_steps_for_projects(&self, project_ids: &[DbId])
        -> Result<Vec<Step>, sqlx::Error>;

    async fn find_step(&self, id: DbId) -> Result<Option<Step>, sqlx::Error>;

    async fn update_step_status(
        &self,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Step>, sqlx::Error>;

    /// Write `(step_id, status_id)` pairs for one project in a single
    /// transaction holding the project row lock. `None` if the project is gone.
    async fn apply_step_statuses(
        &self,
        project_id: DbId,
        updates: &[(DbId, StatusId)],
    ) -> Result<Option<Vec<Step>>, sqlx::Error>;

    // -- progress notes ---------------------------------------------------

    async fn create_note(
        &self,
        author_id: DbId,
        input: &CreateProgressNote,
    ) -> Result<ProgressNote, sqlx::Error>;

    async fn find_note(&self, id: DbId) -> Result<Option<ProgressNote>, sqlx::Error>;

    async fn list_notes(&self, project_id: DbId) -> Result<Vec<ProgressNote>, sqlx::Error>;

    /// Newest first; `public_only` hides private notes.
    async fn list_project_notes_page(
        &self,
        project_id: DbId,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error>;

    async fn list_public_notes(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error>;

    async fn update_note(
        &self,
        id: DbId,
        input: &UpdateProgressNote,
    ) -> Result<Option<ProgressNote>, sqlx::Error>;

    // -- media assets -----------------------------------------------------

    async fn insert_media_asset(&self, input: &CreateMediaAsset)
        -> Result<MediaAsset, sqlx::Error>;

    /// Oldest first.
    async fn list_assets_for_notes(&self, note_ids: &[DbId])
        -> Result<Vec<MediaAsset>, sqlx::Error>;

    async fn latest_assets_for_projects(
        &self,
        project_ids: &[DbId],
        public_only: bool,
    ) -> Result<Vec<ProjectThumbnail>, sqlx::Error>;

    // -- likes ------------------------------------------------------------

    async fn toggle_like(&self, user_id: DbId, project_id: DbId) -> Result<bool, sqlx::Error>;

    async fn count_likes(&self, project_id: DbId) -> Result<i64, sqlx::Error>;

    async fn count_likes_for_projects(
        &self,
        project_ids: &[DbId],
    ) -> Result<Vec<LikeCount>, sqlx::Error>;

    async fn liked_project_ids(
        &self,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error>;
}

/// [`BacklogStore`] backed by Postgres.
#[derive(Clone)]
pub struct PgBacklogStore {
    pool: DbPool,
}

impl PgBacklogStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl BacklogStore for PgBacklogStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        crate::health_check(&self.pool).await
    }

    async fn create_project_with_steps(
        &self,
        owner_id: DbId,
        input: &CreateProject,
        step_names: &[&str],
    ) -> Result<(Project, Vec<Step>), sqlx::Error> {
        ProjectRepo::create_with_steps(&self.pool, owner_id, input, step_names).await
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::find_by_id(&self.pool, id).await
    }

    async fn find_public_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::find_public_by_id(&self.pool, id).await
    }

    async fn list_projects_by_ids(&self, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error> {
        ProjectRepo::list_by_ids(&self.pool, ids).await
    }

    async fn list_projects_by_owner(&self, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        ProjectRepo::list_by_owner(&self.pool, owner_id).await
    }

    async fn list_project_ids_by_owner(&self, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        ProjectRepo::list_ids_by_owner(&self.pool, owner_id).await
    }

    async fn list_public_projects(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let items = ProjectRepo::list_public(&self.pool, limit, offset).await?;
        let total = ProjectRepo::count_public(&self.pool).await?;
        Ok((items, total))
    }

    async fn list_all_projects(
        &self,
        title: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let items = ProjectRepo::list_all(&self.pool, title, limit, offset).await?;
        let total = ProjectRepo::count_all(&self.pool, title).await?;
        Ok((items, total))
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        ProjectRepo::update(&self.pool, id, input).await
    }

    async fn delete_project_cascade(
        &self,
        project_id: DbId,
        note_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        ProjectRepo::delete_cascade(&self.pool, project_id, note_ids).await
    }

    async fn list_steps(&self, project_id: DbId) -> Result<Vec<Step>, sqlx::Error> {
        StepRepo::list_by_project(&self.pool, project_id).await
    }

    async fn list_steps_for_projects(
        &self,
        project_ids: &[DbId],
    ) -> Result<Vec<Step>, sqlx::Error> {
        StepRepo::list_by_projects(&self.pool, project_ids).await
    }

    async fn find_step(&self, id: DbId) -> Result<Option<Step>, sqlx::Error> {
        StepRepo::find_by_id(&self.pool, id).await
    }

    async fn update_step_status(
        &self,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Step>, sqlx::Error> {
        StepRepo::update_status(&self.pool, id, status_id).await
    }

    async fn apply_step_statuses(
        &self,
        project_id: DbId,
        updates: &[(DbId, StatusId)],
    ) -> Result<Option<Vec<Step>>, sqlx::Error> {
        let (step_ids, status_ids): (Vec<DbId>, Vec<StatusId>) = updates.iter().copied().unzip();
        StepRepo::apply_statuses(&self.pool, project_id, &step_ids, &status_ids).await
    }

    async fn create_note(
        &self,
        author_id: DbId,
        input: &CreateProgressNote,
    ) -> Result<ProgressNote, sqlx::Error> {
        ProgressNoteRepo::create(&self.pool, author_id, input).await
    }

    async fn find_note(&self, id: DbId) -> Result<Option<ProgressNote>, sqlx::Error> {
        ProgressNoteRepo::find_by_id(&self.pool, id).await
    }

    async fn list_notes(&self, project_id: DbId) -> Result<Vec<ProgressNote>, sqlx::Error> {
        ProgressNoteRepo::list_by_project(&self.pool, project_id).await
    }

    async fn list_project_notes_page(
        &self,
        project_id: DbId,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error> {
        let items =
            ProgressNoteRepo::list_page_by_project(&self.pool, project_id, public_only, limit, offset)
                .await?;
        let total = ProgressNoteRepo::count_by_project(&self.pool, project_id, public_only).await?;
        Ok((items, total))
    }

    async fn list_public_notes(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error> {
        let items = ProgressNoteRepo::list_public(&self.pool, limit, offset).await?;
        let total = ProgressNoteRepo::count_public(&self.pool).await?;
        Ok((items, total))
    }

    async fn update_note(
        &self,
        id: DbId,
        input: &UpdateProgressNote,
    ) -> Result<Option<ProgressNote>, sqlx::Error> {
        ProgressNoteRepo::update(&self.pool, id, input).await
    }

    async fn insert_media_asset(
        &self,
        input: &CreateMediaAsset,
    ) -> Result<MediaAsset, sqlx::Error> {
        MediaAssetRepo::create(&self.pool, input).await
    }

    async fn list_assets_for_notes(
        &self,
        note_ids: &[DbId],
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        if note_ids.is_empty() {
            return Ok(Vec::new());
        }
        MediaAssetRepo::list_by_notes(&self.pool, note_ids).await
    }

    async fn latest_assets_for_projects(
        &self,
        project_ids: &[DbId],
        public_only: bool,
    ) -> Result<Vec<ProjectThumbnail>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        MediaAssetRepo::latest_by_projects(&self.pool, project_ids, public_only).await
    }

    async fn toggle_like(&self, user_id: DbId, project_id: DbId) -> Result<bool, sqlx::Error> {
        LikeRepo::toggle(&self.pool, user_id, project_id).await
    }

    async fn count_likes(&self, project_id: DbId) -> Result<i64, sqlx::Error> {
        LikeRepo::count_by_project(&self.pool, project_id).await
    }

    async fn count_likes_for_projects(
        &self,
        project_ids: &[DbId],
    ) -> Result<Vec<LikeCount>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        LikeRepo::counts_by_projects(&self.pool, project_ids).await
    }

    async fn liked_project_ids(
        &self,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        if project_ids.is_empty() {
            return Ok(Vec::new());
        }
        LikeRepo::liked_project_ids(&self.pool, user_id, project_ids).await
    }
}
