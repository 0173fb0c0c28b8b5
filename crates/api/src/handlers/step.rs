//! Handlers for `/steps`.

use axum::extract::{Path, State};
use axum::Json;
use backlog_core::status::StepStatus;
use backlog_core::types::DbId;
use backlog_engine::views::StepChange;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateStepStatus {
    pub status: StepStatus,
}

/// PATCH /api/v1/steps/{id}
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStepStatus>,
) -> AppResult<Json<StepChange>> {
    let change = state
        .steps
        .update_step_status(id, user.user_id, input.status)
        .await?;
    Ok(Json(change))
}
