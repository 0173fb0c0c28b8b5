use std::sync::Arc;

use backlog_db::BacklogStore;
use backlog_engine::{CascadeDeleter, MediaService, NoteService, ProjectService, StepService};
use backlog_storage::ObjectStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: every service sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Persistence seam, also used directly by the health check.
    pub store: Arc<dyn BacklogStore>,
    pub config: Arc<ServerConfig>,
    pub projects: Arc<ProjectService>,
    pub steps: Arc<StepService>,
    pub notes: Arc<NoteService>,
    pub media: Arc<MediaService>,
    pub cascade: Arc<CascadeDeleter>,
}

impl AppState {
    /// Wire every service over one store and one object store.
    pub fn new(
        store: Arc<dyn BacklogStore>,
        objects: Arc<dyn ObjectStore>,
        config: ServerConfig,
    ) -> Self {
        let media = Arc::new(MediaService::new(Arc::clone(&store), objects));
        Self {
            projects: Arc::new(ProjectService::new(Arc::clone(&store), Arc::clone(&media))),
            steps: Arc::new(StepService::new(Arc::clone(&store))),
            notes: Arc::new(NoteService::new(Arc::clone(&store), Arc::clone(&media))),
            cascade: Arc::new(CascadeDeleter::new(Arc::clone(&store), Arc::clone(&media))),
            media,
            store,
            config: Arc::new(config),
        }
    }
}
