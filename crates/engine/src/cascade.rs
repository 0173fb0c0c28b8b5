//! Project deletion across Postgres and object storage.
//!
//! The relational cascade runs in one transaction inside the store. Object
//! deletes run only after it commits, one attempt per key, and their
//! failures are logged and swallowed: the accepted failure mode is an
//! orphaned object in the bucket, never a half-deleted project.
//!
//! Two entry points exist on purpose. [`CascadeDeleter::delete_project`]
//! checks ownership; [`CascadeDeleter::delete_project_as_admin`] and
//! [`CascadeDeleter::delete_owner_projects`] do not, and are only reachable
//! from admin-gated routes.

use std::sync::Arc;

use backlog_core::error::CoreError;
use backlog_core::types::DbId;
use backlog_db::BacklogStore;
use serde::Serialize;

use crate::access::ensure_owner;
use crate::error::{EngineError, EngineResult};
use crate::media::MediaService;

/// Outcome of one project deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub project_id: DbId,
    /// Object keys that existed at call time and were targeted for cleanup.
    pub object_keys_targeted: usize,
    /// How many of those deletes failed. Logged only, never an error.
    pub object_deletes_failed: usize,
}

/// Outcome of deleting every project of one owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OwnerCascadeReport {
    pub owner_id: DbId,
    pub projects_deleted: usize,
    pub object_keys_targeted: usize,
}

enum Authority {
    Owner(DbId),
    Admin,
}

pub struct CascadeDeleter {
    store: Arc<dyn BacklogStore>,
    media: Arc<MediaService>,
}

impl CascadeDeleter {
    pub fn new(store: Arc<dyn BacklogStore>, media: Arc<MediaService>) -> Self {
        Self { store, media }
    }

    /// Self-service delete. Fails `AccessDenied` unless `caller_id` owns
    /// the project.
    pub async fn delete_project(
        &self,
        project_id: DbId,
        caller_id: DbId,
    ) -> EngineResult<CascadeReport> {
        self.run(project_id, Authority::Owner(caller_id)).await
    }

    /// Administrative delete. No ownership check.
    pub async fn delete_project_as_admin(&self, project_id: DbId) -> EngineResult<CascadeReport> {
        self.run(project_id, Authority::Admin).await
    }

    /// Account-closure cascade: delete every project `owner_id` has, through
    /// the administrative path. Stops at the first relational failure;
    /// projects deleted before it stay deleted.
    pub async fn delete_owner_projects(&self, owner_id: DbId) -> EngineResult<OwnerCascadeReport> {
        let project_ids = self.store.list_project_ids_by_owner(owner_id).await?;

        let mut report = OwnerCascadeReport {
            owner_id,
            projects_deleted: 0,
            object_keys_targeted: 0,
        };
        for project_id in project_ids {
            match self.run(project_id, Authority::Admin).await {
                Ok(deleted) => {
                    report.projects_deleted += 1;
                    report.object_keys_targeted += deleted.object_keys_targeted;
                }
                // Removed concurrently; nothing left to do for this one.
                Err(EngineError::Core(CoreError::NotFound { .. })) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            owner_id,
            projects_deleted = report.projects_deleted,
            object_keys_targeted = report.object_keys_targeted,
            "Deleted all projects of owner"
        );
        Ok(report)
    }

    async fn run(&self, project_id: DbId, authority: Authority) -> EngineResult<CascadeReport> {
        let not_found = CoreError::NotFound {
            entity: "Project",
            id: project_id,
        };

        let project = self.store.find_project(project_id).await?.ok_or(not_found)?;
        if let Authority::Owner(caller_id) = authority {
            ensure_owner("Project", project.id, project.owner_id, caller_id)?;
        }

        let note_ids: Vec<DbId> = self
            .store
            .list_notes(project_id)
            .await?
            .into_iter()
            .map(|n| n.id)
            .collect();
        let object_keys: Vec<String> = self
            .store
            .list_assets_for_notes(&note_ids)
            .await?
            .into_iter()
            .map(|a| a.object_key)
            .collect();

        let deleted = self
            .store
            .delete_project_cascade(project_id, &note_ids)
            .await?;
        if !deleted {
            return Err(CoreError::NotFound {
                entity: "Project",
                id: project_id,
            }
            .into());
        }

        // Committed. Storage cleanup from here on is best-effort.
        let mut failed = 0;
        for key in &object_keys {
            if !self.media.delete_object(key).await {
                failed += 1;
            }
        }

        tracing::info!(
            project_id,
            owner_id = project.owner_id,
            object_keys_targeted = object_keys.len(),
            object_deletes_failed = failed,
            "Deleted project"
        );

        Ok(CascadeReport {
            project_id,
            object_keys_targeted: object_keys.len(),
            object_deletes_failed: failed,
        })
    }
}
