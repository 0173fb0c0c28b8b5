use axum::routing::post;
use axum::Router;

use crate::handlers::media;
use crate::state::AppState;

/// Routes mounted at `/media`.
///
/// ```text
/// POST   /upload-grants   -> create_upload_grant
/// POST   /                -> register
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload-grants", post(media::create_upload_grant))
        .route("/", post(media::register))
}
