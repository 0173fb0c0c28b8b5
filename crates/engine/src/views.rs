//! Response shapes produced by the services.

use backlog_core::progress::{summarize, CurrentStep, ProgressSummary};
use backlog_core::status::StepStatus;
use backlog_core::types::{DbId, Timestamp};
use backlog_db::models::media_asset::MediaAsset;
use backlog_db::models::progress_note::ProgressNote;
use backlog_db::models::project::Project;
use backlog_db::models::step::Step;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StepItem {
    pub id: DbId,
    pub name: String,
    pub status: StepStatus,
    pub order_index: i32,
}

impl From<&Step> for StepItem {
    fn from(step: &Step) -> Self {
        Self {
            id: step.id,
            name: step.name.clone(),
            status: step.status(),
            order_index: step.order_index,
        }
    }
}

/// Result of a single step status change.
#[derive(Debug, Clone, Serialize)]
pub struct StepChange {
    pub step: StepItem,
    pub project_id: DbId,
    pub percent_complete: i32,
}

/// Progress of one project after a bulk transition.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectProgress {
    pub project_id: DbId,
    pub percent_complete: i32,
    pub current_step: CurrentStep,
    pub steps: Vec<StepItem>,
}

/// Row of the owner's project list.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectSummary {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub percent_complete: i32,
    pub current_step: CurrentStep,
    pub thumbnail_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectSummary {
    pub(crate) fn new(project: Project, steps: &[Step], thumbnail_url: Option<String>) -> Self {
        let ProgressSummary {
            percent_complete,
            current_step,
        } = summarize(steps);
        Self {
            id: project.id,
            title: project.title,
            description: project.description,
            is_public: project.is_public,
            percent_complete,
            current_step,
            thumbnail_url,
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// A project with its ordered steps.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectDetail {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub percent_complete: i32,
    pub current_step: CurrentStep,
    pub steps: Vec<StepItem>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ProjectDetail {
    pub(crate) fn new(project: Project, steps: &[Step]) -> Self {
        let ProgressSummary {
            percent_complete,
            current_step,
        } = summarize(steps);
        Self {
            id: project.id,
            owner_id: project.owner_id,
            title: project.title,
            description: project.description,
            is_public: project.is_public,
            percent_complete,
            current_step,
            steps: steps.iter().map(StepItem::from).collect(),
            created_at: project.created_at,
            updated_at: project.updated_at,
        }
    }
}

/// Row of the public project gallery.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProjectSummary {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub percent_complete: i32,
    pub like_count: i64,
    pub liked: bool,
    pub thumbnail_url: Option<String>,
    pub updated_at: Timestamp,
}

/// Public project page.
#[derive(Debug, Clone, Serialize)]
pub struct PublicProjectDetail {
    #[serde(flatten)]
    pub project: ProjectDetail,
    pub like_count: i64,
    pub liked: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
    pub like_count: i64,
}

/// Admin listing row. Carries the owner id, which the gallery rows omit.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProjectView {
    pub id: DbId,
    pub owner_id: DbId,
    pub title: String,
    pub is_public: bool,
    pub percent_complete: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Media asset plus a URL suited to the viewing context.
#[derive(Debug, Clone, Serialize)]
pub struct AssetView {
    pub id: DbId,
    pub note_id: DbId,
    pub object_key: String,
    pub filename: String,
    pub content_type: String,
    pub url: String,
    pub created_at: Timestamp,
}

impl AssetView {
    pub(crate) fn new(asset: MediaAsset, url: String) -> Self {
        Self {
            id: asset.id,
            note_id: asset.note_id,
            object_key: asset.object_key,
            filename: asset.filename,
            content_type: asset.content_type,
            url,
            created_at: asset.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NoteView {
    pub id: DbId,
    pub project_id: DbId,
    pub project_title: String,
    pub author_id: DbId,
    pub content: String,
    pub is_public: bool,
    pub images: Vec<AssetView>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl NoteView {
    pub(crate) fn new(note: ProgressNote, project_title: String, images: Vec<AssetView>) -> Self {
        Self {
            id: note.id,
            project_id: note.project_id,
            project_title,
            author_id: note.author_id,
            content: note.content,
            is_public: note.is_public,
            images,
            created_at: note.created_at,
            updated_at: note.updated_at,
        }
    }
}
