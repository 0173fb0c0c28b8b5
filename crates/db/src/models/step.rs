//! Step entity model.
//!
//! Steps are created with their project and never added or removed
//! afterwards, so there is no create or update DTO: only `status_id` changes.

use backlog_core::progress::StepView;
use backlog_core::status::{StatusId, StepStatus};
use backlog_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `steps` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Step {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub status_id: StatusId,
    pub order_index: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Step {
    /// Typed status. Unknown ids are treated as `Todo`.
    pub fn status(&self) -> StepStatus {
        StepStatus::from_id(self.status_id).unwrap_or(StepStatus::Todo)
    }
}

impl StepView for Step {
    fn step_name(&self) -> &str {
        &self.name
    }

    fn step_status(&self) -> StepStatus {
        self.status()
    }

    fn order_index(&self) -> i32 {
        self.order_index
    }
}
