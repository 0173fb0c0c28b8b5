//! In-memory [`BacklogStore`] for tests.
//!
//! Mirrors the Postgres semantics the engine relies on: ordering, the
//! all-or-nothing cascade, and `false`/`None` for rows that vanished. Each
//! transactional method mutates state only after every check has passed.
//! Failures can be injected to exercise rollback paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use backlog_core::status::{StatusId, StepStatus};
use backlog_core::types::DbId;
use chrono::Utc;

use crate::models::like::{LikeCount, ProjectLike};
use crate::models::media_asset::{CreateMediaAsset, MediaAsset, ProjectThumbnail};
use crate::models::progress_note::{CreateProgressNote, ProgressNote, UpdateProgressNote};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::step::Step;
use crate::store::BacklogStore;

#[derive(Default)]
struct State {
    next_id: DbId,
    projects: Vec<Project>,
    steps: Vec<Step>,
    notes: Vec<ProgressNote>,
    assets: Vec<MediaAsset>,
    likes: Vec<ProjectLike>,
    fail_cascade: bool,
    fail_asset_insert: bool,
}

impl State {
    fn next_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Rows still referencing a project, per table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DependentRows {
    pub steps: usize,
    pub notes: usize,
    pub assets: usize,
    pub likes: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make the next cascade fail after its reads, before any deletion.
    pub fn fail_next_cascade(&self) {
        self.state().fail_cascade = true;
    }

    /// Make the next media asset insert fail.
    pub fn fail_next_asset_insert(&self) {
        self.state().fail_asset_insert = true;
    }

    pub fn dependent_rows(&self, project_id: DbId) -> DependentRows {
        let state = self.state();
        let note_ids: HashSet<DbId> = state
            .notes
            .iter()
            .filter(|n| n.project_id == project_id)
            .map(|n| n.id)
            .collect();
        DependentRows {
            steps: state.steps.iter().filter(|s| s.project_id == project_id).count(),
            notes: note_ids.len(),
            assets: state.assets.iter().filter(|a| note_ids.contains(&a.note_id)).count(),
            likes: state.likes.iter().filter(|l| l.project_id == project_id).count(),
        }
    }

    pub fn asset_count(&self) -> usize {
        self.state().assets.len()
    }
}

fn injected(what: &str) -> sqlx::Error {
    sqlx::Error::Protocol(format!("injected failure: {what}"))
}

fn page<T: Clone>(rows: &[T], limit: i64, offset: i64) -> Vec<T> {
    rows.iter()
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .cloned()
        .collect()
}

#[async_trait]
impl BacklogStore for MemoryStore {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        Ok(())
    }

    async fn create_project_with_steps(
        &self,
        owner_id: DbId,
        input: &CreateProject,
        step_names: &[&str],
    ) -> Result<(Project, Vec<Step>), sqlx::Error> {
        let mut state = self.state();
        let now = Utc::now();
        let project = Project {
            id: state.next_id(),
            owner_id,
            title: input.title.clone(),
            description: input.description.clone(),
            is_public: false,
            created_at: now,
            updated_at: now,
        };
        let mut steps = Vec::with_capacity(step_names.len());
        for (i, name) in step_names.iter().enumerate() {
            steps.push(Step {
                id: state.next_id(),
                project_id: project.id,
                name: name.to_string(),
                status_id: StepStatus::Todo.id(),
                order_index: i as i32,
                created_at: now,
                updated_at: now,
            });
        }
        state.projects.push(project.clone());
        state.steps.extend(steps.iter().cloned());
        Ok((project, steps))
    }

    async fn find_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        Ok(self.state().projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_public_project(&self, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        Ok(self
            .state()
            .projects
            .iter()
            .find(|p| p.id == id && p.is_public)
            .cloned())
    }

    async fn list_projects_by_ids(&self, ids: &[DbId]) -> Result<Vec<Project>, sqlx::Error> {
        Ok(self
            .state()
            .projects
            .iter()
            .filter(|p| ids.contains(&p.id))
            .cloned()
            .collect())
    }

    async fn list_projects_by_owner(&self, owner_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let mut rows: Vec<Project> = self
            .state()
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok(rows)
    }

    async fn list_project_ids_by_owner(&self, owner_id: DbId) -> Result<Vec<DbId>, sqlx::Error> {
        let mut ids: Vec<DbId> = self
            .state()
            .projects
            .iter()
            .filter(|p| p.owner_id == owner_id)
            .map(|p| p.id)
            .collect();
        ids.sort_unstable();
        Ok(ids)
    }

    async fn list_public_projects(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let mut rows: Vec<Project> = self
            .state()
            .projects
            .iter()
            .filter(|p| p.is_public)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.updated_at, b.id).cmp(&(a.updated_at, a.id)));
        Ok((page(&rows, limit, offset), rows.len() as i64))
    }

    async fn list_all_projects(
        &self,
        title: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Project>, i64), sqlx::Error> {
        let needle = title.map(str::to_lowercase);
        let mut rows: Vec<Project> = self
            .state()
            .projects
            .iter()
            .filter(|p| match &needle {
                Some(n) => p.title.to_lowercase().contains(n.as_str()),
                None => true,
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok((page(&rows, limit, offset), rows.len() as i64))
    }

    async fn update_project(
        &self,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut state = self.state();
        let Some(project) = state.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &input.title {
            project.title = title.clone();
        }
        if let Some(description) = &input.description {
            project.description = Some(description.clone());
        }
        if let Some(is_public) = input.is_public {
            project.is_public = is_public;
        }
        project.updated_at = Utc::now();
        Ok(Some(project.clone()))
    }

    async fn delete_project_cascade(
        &self,
        project_id: DbId,
        note_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut state = self.state();
        if std::mem::take(&mut state.fail_cascade) {
            return Err(injected("cascade"));
        }
        if !state.projects.iter().any(|p| p.id == project_id) {
            return Ok(false);
        }
        state.assets.retain(|a| !note_ids.contains(&a.note_id));
        state.notes.retain(|n| n.project_id != project_id);
        state.steps.retain(|s| s.project_id != project_id);
        state.likes.retain(|l| l.project_id != project_id);
        state.projects.retain(|p| p.id != project_id);
        Ok(true)
    }

    async fn list_steps(&self, project_id: DbId) -> Result<Vec<Step>, sqlx::Error> {
        let mut steps: Vec<Step> = self
            .state()
            .steps
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order_index);
        Ok(steps)
    }

    async fn list_steps_for_projects(
        &self,
        project_ids: &[DbId],
    ) -> Result<Vec<Step>, sqlx::Error> {
        let mut steps: Vec<Step> = self
            .state()
            .steps
            .iter()
            .filter(|s| project_ids.contains(&s.project_id))
            .cloned()
            .collect();
        steps.sort_by_key(|s| (s.project_id, s.order_index));
        Ok(steps)
    }

    async fn find_step(&self, id: DbId) -> Result<Option<Step>, sqlx::Error> {
        Ok(self.state().steps.iter().find(|s| s.id == id).cloned())
    }

    async fn update_step_status(
        &self,
        id: DbId,
        status_id: StatusId,
    ) -> Result<Option<Step>, sqlx::Error> {
        let mut state = self.state();
        let Some(step) = state.steps.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        step.status_id = status_id;
        step.updated_at = Utc::now();
        Ok(Some(step.clone()))
    }

    async fn apply_step_statuses(
        &self,
        project_id: DbId,
        updates: &[(DbId, StatusId)],
    ) -> Result<Option<Vec<Step>>, sqlx::Error> {
        let mut state = self.state();
        if !state.projects.iter().any(|p| p.id == project_id) {
            return Ok(None);
        }
        let updates: HashMap<DbId, StatusId> = updates.iter().copied().collect();
        let now = Utc::now();
        for step in state.steps.iter_mut().filter(|s| s.project_id == project_id) {
            if let Some(&status_id) = updates.get(&step.id) {
                if step.status_id != status_id {
                    step.status_id = status_id;
                    step.updated_at = now;
                }
            }
        }
        let mut steps: Vec<Step> = state
            .steps
            .iter()
            .filter(|s| s.project_id == project_id)
            .cloned()
            .collect();
        steps.sort_by_key(|s| s.order_index);
        Ok(Some(steps))
    }

    async fn create_note(
        &self,
        author_id: DbId,
        input: &CreateProgressNote,
    ) -> Result<ProgressNote, sqlx::Error> {
        let mut state = self.state();
        if !state.projects.iter().any(|p| p.id == input.project_id) {
            return Err(injected("fk_progress_notes_project"));
        }
        let now = Utc::now();
        let note = ProgressNote {
            id: state.next_id(),
            project_id: input.project_id,
            author_id,
            content: input.content.clone(),
            is_public: input.is_public.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };
        state.notes.push(note.clone());
        Ok(note)
    }

    async fn find_note(&self, id: DbId) -> Result<Option<ProgressNote>, sqlx::Error> {
        Ok(self.state().notes.iter().find(|n| n.id == id).cloned())
    }

    async fn list_notes(&self, project_id: DbId) -> Result<Vec<ProgressNote>, sqlx::Error> {
        Ok(self
            .state()
            .notes
            .iter()
            .filter(|n| n.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn list_project_notes_page(
        &self,
        project_id: DbId,
        public_only: bool,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error> {
        let mut rows: Vec<ProgressNote> = self
            .state()
            .notes
            .iter()
            .filter(|n| n.project_id == project_id && (n.is_public || !public_only))
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok((page(&rows, limit, offset), rows.len() as i64))
    }

    async fn list_public_notes(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<ProgressNote>, i64), sqlx::Error> {
        let mut rows: Vec<ProgressNote> = self
            .state()
            .notes
            .iter()
            .filter(|n| n.is_public)
            .cloned()
            .collect();
        rows.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        Ok((page(&rows, limit, offset), rows.len() as i64))
    }

    async fn update_note(
        &self,
        id: DbId,
        input: &UpdateProgressNote,
    ) -> Result<Option<ProgressNote>, sqlx::Error> {
        let mut state = self.state();
        let Some(note) = state.notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        if let Some(content) = &input.content {
            note.content = content.clone();
        }
        if let Some(is_public) = input.is_public {
            note.is_public = is_public;
        }
        note.updated_at = Utc::now();
        Ok(Some(note.clone()))
    }

    async fn insert_media_asset(
        &self,
        input: &CreateMediaAsset,
    ) -> Result<MediaAsset, sqlx::Error> {
        let mut state = self.state();
        if std::mem::take(&mut state.fail_asset_insert) {
            return Err(injected("media asset insert"));
        }
        if state.assets.iter().any(|a| a.object_key == input.object_key) {
            return Err(injected("uq_media_assets_object_key"));
        }
        let asset = MediaAsset {
            id: state.next_id(),
            note_id: input.note_id,
            object_key: input.object_key.clone(),
            filename: input.filename.clone(),
            content_type: input.content_type.clone(),
            created_at: Utc::now(),
        };
        state.assets.push(asset.clone());
        Ok(asset)
    }

    async fn list_assets_for_notes(
        &self,
        note_ids: &[DbId],
    ) -> Result<Vec<MediaAsset>, sqlx::Error> {
        let mut rows: Vec<MediaAsset> = self
            .state()
            .assets
            .iter()
            .filter(|a| note_ids.contains(&a.note_id))
            .cloned()
            .collect();
        rows.sort_by_key(|a| (a.created_at, a.id));
        Ok(rows)
    }

    async fn latest_assets_for_projects(
        &self,
        project_ids: &[DbId],
        public_only: bool,
    ) -> Result<Vec<ProjectThumbnail>, sqlx::Error> {
        let state = self.state();
        let mut latest: HashMap<DbId, &MediaAsset> = HashMap::new();
        for asset in &state.assets {
            let Some(note) = state.notes.iter().find(|n| n.id == asset.note_id) else {
                continue;
            };
            if !project_ids.contains(&note.project_id) || (public_only && !note.is_public) {
                continue;
            }
            let newer = latest
                .get(&note.project_id)
                .map_or(true, |cur| (asset.created_at, asset.id) > (cur.created_at, cur.id));
            if newer {
                latest.insert(note.project_id, asset);
            }
        }
        Ok(latest
            .into_iter()
            .map(|(project_id, asset)| ProjectThumbnail {
                project_id,
                object_key: asset.object_key.clone(),
            })
            .collect())
    }

    async fn toggle_like(&self, user_id: DbId, project_id: DbId) -> Result<bool, sqlx::Error> {
        let mut state = self.state();
        let before = state.likes.len();
        state
            .likes
            .retain(|l| !(l.user_id == user_id && l.project_id == project_id));
        if state.likes.len() < before {
            return Ok(false);
        }
        let like = ProjectLike {
            id: state.next_id(),
            user_id,
            project_id,
            created_at: Utc::now(),
        };
        state.likes.push(like);
        Ok(true)
    }

    async fn count_likes(&self, project_id: DbId) -> Result<i64, sqlx::Error> {
        Ok(self
            .state()
            .likes
            .iter()
            .filter(|l| l.project_id == project_id)
            .count() as i64)
    }

    async fn count_likes_for_projects(
        &self,
        project_ids: &[DbId],
    ) -> Result<Vec<LikeCount>, sqlx::Error> {
        let mut counts: HashMap<DbId, i64> = HashMap::new();
        for like in self.state().likes.iter() {
            if project_ids.contains(&like.project_id) {
                *counts.entry(like.project_id).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .map(|(project_id, like_count)| LikeCount {
                project_id,
                like_count,
            })
            .collect())
    }

    async fn liked_project_ids(
        &self,
        user_id: DbId,
        project_ids: &[DbId],
    ) -> Result<Vec<DbId>, sqlx::Error> {
        Ok(self
            .state()
            .likes
            .iter()
            .filter(|l| l.user_id == user_id && project_ids.contains(&l.project_id))
            .map(|l| l.project_id)
            .collect())
    }
}
