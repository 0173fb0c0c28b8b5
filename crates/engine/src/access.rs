//! Ownership-gated loading shared by the self-service paths.

use backlog_core::error::CoreError;
use backlog_core::ownership::assert_owns;
use backlog_core::types::DbId;
use backlog_db::models::project::Project;
use backlog_db::BacklogStore;

use crate::error::EngineResult;

/// [`assert_owns`] plus a `warn` event naming both parties on denial.
pub(crate) fn ensure_owner(
    entity: &'static str,
    entity_id: DbId,
    owner_id: DbId,
    caller_id: DbId,
) -> Result<(), CoreError> {
    assert_owns(entity, entity_id, owner_id, caller_id).inspect_err(|_| {
        tracing::warn!(
            entity,
            entity_id,
            owner_id,
            caller_id,
            "Ownership check failed"
        );
    })
}

/// Load a project, failing `NotFound` if absent and `AccessDenied` unless
/// `caller_id` owns it.
pub(crate) async fn load_owned_project(
    store: &dyn BacklogStore,
    project_id: DbId,
    caller_id: DbId,
) -> EngineResult<Project> {
    let project = store
        .find_project(project_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Project",
            id: project_id,
        })?;
    ensure_owner("Project", project.id, project.owner_id, caller_id)?;
    Ok(project)
}
