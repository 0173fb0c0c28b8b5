//! Shared fixtures for engine integration tests.
//!
//! Services are wired against the in-memory store and object store so the
//! cascade and ownership paths can be exercised without Postgres or S3.

#![allow(dead_code)]

use std::sync::Arc;

use backlog_core::types::DbId;
use backlog_db::memory::MemoryStore;
use backlog_db::models::progress_note::CreateProgressNote;
use backlog_db::models::project::{CreateProject, UpdateProject};
use backlog_db::BacklogStore;
use backlog_engine::{CascadeDeleter, MediaService, NoteService, ProjectService, StepService};
use backlog_storage::memory::MemoryObjectStore;

pub const CDN: &str = "https://cdn.example.com";

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub media: Arc<MediaService>,
    pub cascade: CascadeDeleter,
    pub projects: ProjectService,
    pub steps: StepService,
    pub notes: NoteService,
}

pub fn harness() -> Harness {
    harness_with(MemoryObjectStore::new())
}

pub fn harness_with_cdn() -> Harness {
    harness_with(MemoryObjectStore::with_public_url_base(CDN))
}

fn harness_with(objects: MemoryObjectStore) -> Harness {
    let store = Arc::new(MemoryStore::new());
    let objects = Arc::new(objects);
    let media = Arc::new(MediaService::new(store.clone(), objects.clone()));
    Harness {
        cascade: CascadeDeleter::new(store.clone(), media.clone()),
        projects: ProjectService::new(store.clone(), media.clone()),
        steps: StepService::new(store.clone()),
        notes: NoteService::new(store.clone(), media.clone()),
        store,
        objects,
        media,
    }
}

impl Harness {
    /// Create a project with the default template and return its id.
    pub async fn project(&self, owner_id: DbId, title: &str) -> DbId {
        self.projects
            .create_project(
                owner_id,
                &CreateProject {
                    title: title.to_string(),
                    description: None,
                },
            )
            .await
            .unwrap()
            .id
    }

    pub async fn public_project(&self, owner_id: DbId, title: &str) -> DbId {
        let id = self.project(owner_id, title).await;
        self.store
            .update_project(
                id,
                &UpdateProject {
                    is_public: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        id
    }

    pub async fn note(&self, author_id: DbId, project_id: DbId, public: bool) -> DbId {
        self.notes
            .create_note(
                author_id,
                &CreateProgressNote {
                    project_id,
                    content: format!("update on {project_id}"),
                    is_public: Some(public),
                },
            )
            .await
            .unwrap()
            .id
    }

    /// Upload-and-register an image on a note, returning its object key.
    pub async fn image(&self, owner_id: DbId, note_id: DbId) -> String {
        let grant = self
            .media
            .generate_upload_grant(owner_id, "image/png")
            .await
            .unwrap();
        self.media
            .register_asset(owner_id, &grant.object_key, note_id)
            .await
            .unwrap();
        grant.object_key
    }
}
