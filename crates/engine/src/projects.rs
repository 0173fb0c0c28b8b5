//! Project lifecycle (other than deletion), public gallery, likes, and the
//! admin listing.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use backlog_core::error::CoreError;
use backlog_core::pagination::{Page, PageRequest};
use backlog_core::progress::percent_complete;
use backlog_core::template::DEFAULT_STEPS;
use backlog_core::types::DbId;
use backlog_core::validation::{validate_description, validate_title};
use backlog_db::models::project::{CreateProject, Project, UpdateProject};
use backlog_db::models::step::Step;
use backlog_db::BacklogStore;

use crate::access::load_owned_project;
use crate::error::EngineResult;
use crate::media::MediaService;
use crate::views::{
    AdminProjectView, LikeStatus, ProjectDetail, ProjectSummary, PublicProjectDetail,
    PublicProjectSummary,
};

pub struct ProjectService {
    store: Arc<dyn BacklogStore>,
    media: Arc<MediaService>,
}

impl ProjectService {
    pub fn new(store: Arc<dyn BacklogStore>, media: Arc<MediaService>) -> Self {
        Self { store, media }
    }

    /// Create a project together with the default step template.
    pub async fn create_project(
        &self,
        owner_id: DbId,
        input: &CreateProject,
    ) -> EngineResult<ProjectDetail> {
        validate_title(&input.title)?;
        if let Some(description) = &input.description {
            validate_description(description)?;
        }

        let (project, steps) = self
            .store
            .create_project_with_steps(owner_id, input, DEFAULT_STEPS)
            .await?;
        tracing::info!(project_id = project.id, owner_id, "Created project");
        Ok(ProjectDetail::new(project, &steps))
    }

    /// The caller's projects, newest first, with progress and thumbnails.
    pub async fn list_my_projects(&self, owner_id: DbId) -> EngineResult<Vec<ProjectSummary>> {
        let projects = self.store.list_projects_by_owner(owner_id).await?;
        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
        let mut steps = self.steps_by_project(&ids).await?;
        let mut thumbnails = self.media.thumbnails(&ids, false).await?;

        Ok(projects
            .into_iter()
            .map(|p| {
                let steps = steps.remove(&p.id).unwrap_or_default();
                let thumbnail = thumbnails.remove(&p.id);
                ProjectSummary::new(p, &steps, thumbnail)
            })
            .collect())
    }

    pub async fn get_project_detail(
        &self,
        project_id: DbId,
        caller_id: DbId,
    ) -> EngineResult<ProjectDetail> {
        let project = load_owned_project(self.store.as_ref(), project_id, caller_id).await?;
        let steps = self.store.list_steps(project_id).await?;
        Ok(ProjectDetail::new(project, &steps))
    }

    /// Partial update; omitted fields keep their values.
    pub async fn update_project(
        &self,
        project_id: DbId,
        caller_id: DbId,
        input: &UpdateProject,
    ) -> EngineResult<ProjectDetail> {
        if let Some(title) = &input.title {
            validate_title(title)?;
        }
        if let Some(description) = &input.description {
            validate_description(description)?;
        }
        load_owned_project(self.store.as_ref(), project_id, caller_id).await?;

        let project = self.update_or_not_found(project_id, input).await?;
        tracing::info!(project_id, caller_id, "Updated project");
        let steps = self.store.list_steps(project_id).await?;
        Ok(ProjectDetail::new(project, &steps))
    }

    /// Public gallery, most recently updated first. `viewer_id` fills in
    /// the `liked` flag.
    pub async fn list_public_projects(
        &self,
        request: PageRequest,
        viewer_id: Option<DbId>,
    ) -> EngineResult<Page<PublicProjectSummary>> {
        let (projects, total) = self
            .store
            .list_public_projects(request.limit(), request.offset())
            .await?;
        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();

        let steps = self.steps_by_project(&ids).await?;
        let mut thumbnails = self.media.thumbnails(&ids, true).await?;
        let like_counts: HashMap<DbId, i64> = self
            .store
            .count_likes_for_projects(&ids)
            .await?
            .into_iter()
            .map(|c| (c.project_id, c.like_count))
            .collect();
        let liked: HashSet<DbId> = match viewer_id {
            Some(viewer) => self
                .store
                .liked_project_ids(viewer, &ids)
                .await?
                .into_iter()
                .collect(),
            None => HashSet::new(),
        };

        let items = projects
            .into_iter()
            .map(|p| PublicProjectSummary {
                id: p.id,
                owner_id: p.owner_id,
                percent_complete: steps.get(&p.id).map_or(0, |s| percent_complete(s)),
                like_count: like_counts.get(&p.id).copied().unwrap_or(0),
                liked: liked.contains(&p.id),
                thumbnail_url: thumbnails.remove(&p.id),
                title: p.title,
                description: p.description,
                updated_at: p.updated_at,
            })
            .collect();
        Ok(Page::new(items, request, total))
    }

    /// Public project page. `NotFound` unless the project is public.
    pub async fn get_public_project(
        &self,
        project_id: DbId,
        viewer_id: Option<DbId>,
    ) -> EngineResult<PublicProjectDetail> {
        let project = self.find_public(project_id).await?;
        let steps = self.store.list_steps(project_id).await?;
        let like_count = self.store.count_likes(project_id).await?;
        let liked = match viewer_id {
            Some(viewer) => !self
                .store
                .liked_project_ids(viewer, &[project_id])
                .await?
                .is_empty(),
            None => false,
        };
        Ok(PublicProjectDetail {
            project: ProjectDetail::new(project, &steps),
            like_count,
            liked,
        })
    }

    /// Like or unlike a public project.
    pub async fn toggle_like(&self, caller_id: DbId, project_id: DbId) -> EngineResult<LikeStatus> {
        self.find_public(project_id).await?;
        let liked = self.store.toggle_like(caller_id, project_id).await?;
        let like_count = self.store.count_likes(project_id).await?;
        tracing::info!(project_id, caller_id, liked, "Toggled like");
        Ok(LikeStatus { liked, like_count })
    }

    /// Admin listing across all owners, optionally filtered by title.
    pub async fn list_all_projects(
        &self,
        request: PageRequest,
        title: Option<&str>,
    ) -> EngineResult<Page<AdminProjectView>> {
        let title = title.map(str::trim).filter(|t| !t.is_empty());
        let (projects, total) = self
            .store
            .list_all_projects(title, request.limit(), request.offset())
            .await?;
        let ids: Vec<DbId> = projects.iter().map(|p| p.id).collect();
        let steps = self.steps_by_project(&ids).await?;

        let items = projects
            .into_iter()
            .map(|p| AdminProjectView {
                id: p.id,
                owner_id: p.owner_id,
                percent_complete: steps.get(&p.id).map_or(0, |s| percent_complete(s)),
                title: p.title,
                is_public: p.is_public,
                created_at: p.created_at,
                updated_at: p.updated_at,
            })
            .collect();
        Ok(Page::new(items, request, total))
    }

    /// Admin visibility override. No ownership check.
    pub async fn set_project_visibility(
        &self,
        project_id: DbId,
        is_public: bool,
    ) -> EngineResult<Project> {
        let input = UpdateProject {
            is_public: Some(is_public),
            ..Default::default()
        };
        let project = self.update_or_not_found(project_id, &input).await?;
        tracing::info!(project_id, is_public, "Admin changed project visibility");
        Ok(project)
    }

    async fn update_or_not_found(
        &self,
        project_id: DbId,
        input: &UpdateProject,
    ) -> EngineResult<Project> {
        Ok(self
            .store
            .update_project(project_id, input)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?)
    }

    async fn find_public(&self, project_id: DbId) -> EngineResult<Project> {
        Ok(self
            .store
            .find_public_project(project_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            })?)
    }

    async fn steps_by_project(&self, ids: &[DbId]) -> EngineResult<HashMap<DbId, Vec<Step>>> {
        let mut grouped: HashMap<DbId, Vec<Step>> = HashMap::new();
        if ids.is_empty() {
            return Ok(grouped);
        }
        for step in self.store.list_steps_for_projects(ids).await? {
            grouped.entry(step.project_id).or_default().push(step);
        }
        Ok(grouped)
    }
}
