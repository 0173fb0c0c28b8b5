//! Handlers for the caller's own `/projects`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use backlog_core::types::DbId;
use backlog_db::models::project::{CreateProject, UpdateProject};
use backlog_engine::views::{LikeStatus, ProjectDetail, ProjectProgress, ProjectSummary};
use backlog_engine::CascadeReport;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Body of the bulk step transition.
#[derive(Debug, Deserialize)]
pub struct TransitionRequest {
    /// A step name, `"not started"`, or `"complete"`.
    pub current_step: String,
}

/// POST /api/v1/projects
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<ProjectDetail>)> {
    let detail = state.projects.create_project(user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/projects
pub async fn list_mine(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<ProjectSummary>>> {
    let projects = state.projects.list_my_projects(user.user_id).await?;
    Ok(Json(projects))
}

/// GET /api/v1/projects/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<ProjectDetail>> {
    let detail = state.projects.get_project_detail(id, user.user_id).await?;
    Ok(Json(detail))
}

/// PATCH /api/v1/projects/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<ProjectDetail>> {
    let detail = state.projects.update_project(id, user.user_id, &input).await?;
    Ok(Json(detail))
}

/// DELETE /api/v1/projects/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<CascadeReport>> {
    let report = state.cascade.delete_project(id, user.user_id).await?;
    Ok(Json(report))
}

/// PUT /api/v1/projects/{id}/current-step
pub async fn transition(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<TransitionRequest>,
) -> AppResult<Json<ProjectProgress>> {
    let progress = state
        .steps
        .transition_steps(id, user.user_id, &input.current_step)
        .await?;
    Ok(Json(progress))
}

/// POST /api/v1/projects/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<LikeStatus>> {
    let status = state.projects.toggle_like(user.user_id, id).await?;
    Ok(Json(status))
}
