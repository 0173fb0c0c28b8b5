use axum::routing::{delete, get, patch};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin`. Every handler requires the admin role.
///
/// ```text
/// GET    /projects                -> list_projects
/// PATCH  /projects/{id}           -> set_visibility
/// DELETE /projects/{id}           -> delete_project
/// DELETE /users/{id}/projects     -> delete_user_projects
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(admin::list_projects))
        .route(
            "/projects/{id}",
            patch(admin::set_visibility).delete(admin::delete_project),
        )
        .route("/users/{id}/projects", delete(admin::delete_user_projects))
}
