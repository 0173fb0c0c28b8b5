//! Handlers for the two-phase image upload.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use backlog_core::types::DbId;
use backlog_engine::views::AssetView;
use backlog_engine::UploadGrant;
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UploadGrantRequest {
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterAssetRequest {
    pub object_key: String,
    pub note_id: DbId,
}

/// POST /api/v1/media/upload-grants
pub async fn create_upload_grant(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<UploadGrantRequest>,
) -> AppResult<(StatusCode, Json<UploadGrant>)> {
    let grant = state
        .media
        .generate_upload_grant(user.user_id, &input.content_type)
        .await?;
    Ok((StatusCode::CREATED, Json(grant)))
}

/// POST /api/v1/media
pub async fn register(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<RegisterAssetRequest>,
) -> AppResult<(StatusCode, Json<AssetView>)> {
    let asset = state
        .media
        .register_asset(user.user_id, &input.object_key, input.note_id)
        .await?;
    Ok((StatusCode::CREATED, Json(asset)))
}
