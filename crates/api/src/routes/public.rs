//! Public, optionally-authenticated routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::public;
use crate::state::AppState;

/// Routes mounted at `/public`.
///
/// ```text
/// GET    /projects              -> list_projects
/// GET    /projects/{id}         -> get_project
/// GET    /projects/{id}/notes   -> list_project_notes
/// GET    /notes                 -> list_notes
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(public::list_projects))
        .route("/projects/{id}", get(public::get_project))
        .route("/projects/{id}/notes", get(public::list_project_notes))
        .route("/notes", get(public::list_notes))
}
