//! Handlers for progress notes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use backlog_core::pagination::Page;
use backlog_core::types::DbId;
use backlog_db::models::progress_note::{CreateProgressNote, UpdateProgressNote};
use backlog_engine::views::NoteView;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/v1/notes
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateProgressNote>,
) -> AppResult<(StatusCode, Json<NoteView>)> {
    let note = state.notes.create_note(user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(note)))
}

/// GET /api/v1/projects/{id}/notes
pub async fn list_for_project(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Page<NoteView>>> {
    let page = state
        .notes
        .list_project_notes(project_id, user.user_id, params.to_request())
        .await?;
    Ok(Json(page))
}

/// PATCH /api/v1/notes/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProgressNote>,
) -> AppResult<Json<NoteView>> {
    let note = state.notes.update_note(id, user.user_id, &input).await?;
    Ok(Json(note))
}
