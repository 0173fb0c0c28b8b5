//! Ownership predicate for private resources.
//!
//! Every self-service read or mutation of a private resource passes through
//! [`assert_owner`]. Administrative operations never call into this module;
//! they go through separate entry points (see `backlog_engine::cascade`).

use crate::error::CoreError;
use crate::types::DbId;

/// Fail with [`CoreError::AccessDenied`] unless `caller_id` owns the resource.
pub fn assert_owner(resource_owner_id: DbId, caller_id: DbId) -> Result<(), CoreError> {
    if resource_owner_id == caller_id {
        Ok(())
    } else {
        Err(CoreError::AccessDenied(format!(
            "user {caller_id} does not own this resource"
        )))
    }
}

/// Like [`assert_owner`], naming the resource in the error message.
pub fn assert_owns(
    entity: &'static str,
    entity_id: DbId,
    resource_owner_id: DbId,
    caller_id: DbId,
) -> Result<(), CoreError> {
    if resource_owner_id == caller_id {
        Ok(())
    } else {
        Err(CoreError::AccessDenied(format!(
            "{entity} {entity_id} is not owned by user {caller_id}"
        )))
    }
}
