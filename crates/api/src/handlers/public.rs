//! Anonymous-friendly public gallery and feeds.

use axum::extract::{Path, Query, State};
use axum::Json;
use backlog_core::pagination::Page;
use backlog_core::types::DbId;
use backlog_engine::views::{NoteView, PublicProjectDetail, PublicProjectSummary};

use crate::error::AppResult;
use crate::middleware::auth::MaybeAuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// GET /api/v1/public/projects
pub async fn list_projects(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<PublicProjectSummary>>> {
    let page = state
        .projects
        .list_public_projects(params.to_request(), viewer.user_id())
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/public/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<PublicProjectDetail>> {
    let detail = state
        .projects
        .get_public_project(id, viewer.user_id())
        .await?;
    Ok(Json(detail))
}

/// GET /api/v1/public/projects/{id}/notes
pub async fn list_project_notes(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<NoteView>>> {
    let page = state
        .notes
        .list_public_project_notes(id, params.to_request())
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/public/notes
pub async fn list_notes(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<NoteView>>> {
    let page = state.notes.list_public_notes(params.to_request()).await?;
    Ok(Json(page))
}
