pub mod admin;
pub mod health;
pub mod media;
pub mod note;
pub mod project;
pub mod public;
pub mod step;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /projects                          list mine, create (auth)
/// /projects/{id}                     get, update, delete (owner)
/// /projects/{id}/current-step        bulk step transition (owner)
/// /projects/{id}/notes               owner note listing
/// /projects/{id}/like                toggle like (auth, public projects)
///
/// /steps/{id}                        single step status (owner)
///
/// /notes                             create (owner of the project)
/// /notes/{id}                        update (author)
///
/// /media/upload-grants               presigned upload URL
/// /media                             register an uploaded object
///
/// /public/projects                   gallery (optional auth)
/// /public/projects/{id}              public project page
/// /public/projects/{id}/notes        public notes of a public project
/// /public/notes                      global public feed
///
/// /admin/projects                    list all (admin)
/// /admin/projects/{id}               visibility override, delete (admin)
/// /admin/users/{id}/projects         delete every project of a user (admin)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/steps", step::router())
        .nest("/notes", note::router())
        .nest("/media", media::router())
        .nest("/public", public::router())
        .nest("/admin", admin::router())
}
