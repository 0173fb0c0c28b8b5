//! Route definitions for the caller's own `/projects`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{note, project};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                    -> list_mine
/// POST   /                    -> create
/// GET    /{id}                -> get_by_id
/// PATCH  /{id}                -> update
/// DELETE /{id}                -> delete
/// PUT    /{id}/current-step   -> transition
/// GET    /{id}/notes          -> note::list_for_project
/// POST   /{id}/like           -> toggle_like
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(project::list_mine).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/current-step", put(project::transition))
        .route("/{id}/notes", get(note::list_for_project))
        .route("/{id}/like", post(project::toggle_like))
}
