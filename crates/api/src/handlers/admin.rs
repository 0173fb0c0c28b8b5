//! Administrative tier. Every handler requires [`RequireAdmin`] and calls the
//! unchecked engine entry points.

use axum::extract::{Path, Query, State};
use axum::Json;
use backlog_core::pagination::{Page, PageRequest};
use backlog_core::types::DbId;
use backlog_db::models::project::Project;
use backlog_engine::views::AdminProjectView;
use backlog_engine::{CascadeReport, OwnerCascadeReport};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::AdminProjectParams;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub is_public: bool,
}

/// GET /api/v1/admin/projects
pub async fn list_projects(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<AdminProjectParams>,
) -> AppResult<Json<Page<AdminProjectView>>> {
    let page = state
        .projects
        .list_all_projects(
            PageRequest::new(params.page, params.size),
            params.title.as_deref(),
        )
        .await?;
    Ok(Json(page))
}

/// PATCH /api/v1/admin/projects/{id}
pub async fn set_visibility(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<VisibilityRequest>,
) -> AppResult<Json<Project>> {
    tracing::info!(admin_id = admin.user_id, project_id = id, "Admin visibility override");
    let project = state
        .projects
        .set_project_visibility(id, input.is_public)
        .await?;
    Ok(Json(project))
}

/// DELETE /api/v1/admin/projects/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<CascadeReport>> {
    tracing::info!(admin_id = admin.user_id, project_id = id, "Admin project delete");
    let report = state.cascade.delete_project_as_admin(id).await?;
    Ok(Json(report))
}

/// DELETE /api/v1/admin/users/{id}/projects
pub async fn delete_user_projects(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(owner_id): Path<DbId>,
) -> AppResult<Json<OwnerCascadeReport>> {
    tracing::info!(admin_id = admin.user_id, owner_id, "Admin account-closure cascade");
    let report = state.cascade.delete_owner_projects(owner_id).await?;
    Ok(Json(report))
}
