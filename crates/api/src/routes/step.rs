use axum::routing::patch;
use axum::Router;

use crate::handlers::step;
use crate::state::AppState;

/// Routes mounted at `/steps`.
///
/// ```text
/// PATCH  /{id}   -> update_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/{id}", patch(step::update_status))
}
